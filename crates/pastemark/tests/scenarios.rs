use pastemark::converter::rules::{
    bold_rule, google_docs_bold_wrapper_rule, plain_span_rule, styled_span_rule,
};
use pastemark::{
    convert_to_markdown, description_to_html, detect_format, handle_paste_event, is_html,
    repair_markdown, sanitize_html, ConversionResult, DataTransfer, Format, MarkdownConverter,
    MarkdownOptions,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::html_paragraph("<p>Hello <b>world</b></p>", Format::Html, "Hello **world**")]
#[case::google_docs_wrapper(
    r#"<b style="font-weight:normal">Wrapped <b>bold</b> text</b>"#,
    Format::Html,
    "Wrapped **bold** text"
)]
#[case::glued_markdown("word**bold**", Format::Markdown, "word\n\n**bold**")]
#[case::plain_url(
    "Check https://example.com now",
    Format::Plain,
    "Check [https://example.com](https://example.com) now"
)]
fn test_convert_to_markdown(#[case] input: &str, #[case] format: Format, #[case] expected: &str) {
    let result = convert_to_markdown(input);
    assert_eq!(result.detected_format, format);
    assert_eq!(result.markdown, expected);
}

#[test]
fn test_empty_input_yields_empty_result() {
    assert_eq!(
        convert_to_markdown(""),
        ConversionResult {
            markdown: String::new(),
            detected_format: Format::Plain,
            original_length: 0,
            converted_length: 0,
        }
    );
}

#[rstest]
#[case::empty_paragraph("<p></p>", "")]
#[case::empty_with_break("<p><br></p>", "")]
#[case::whitespace("   ", "")]
#[case::trailing_runs("<p>Text</p><p></p><p><br/></p>", "<p>Text</p>")]
#[case::leading_runs("<p> </p><p>Text</p>", "<p>Text</p>")]
fn test_sanitize(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sanitize_html(input), expected);
}

#[rstest]
#[case::word_export(
    "<html><head><meta charset=\"utf-8\"><style>p{margin:0}</style></head><body>\
     <!--StartFragment--><p class=MsoNormal>Price:&nbsp;<b>10 zł</b><o:p></o:p></p>\
     <p class=MsoNormal><o:p>&nbsp;</o:p></p><!--EndFragment--></body></html>",
    "Price: **10 zł**"
)]
#[case::google_docs_export(
    "<meta charset=\"utf-8\"><b style=\"font-weight:normal;\" id=\"docs-internal-guid-1\">\
     <p dir=\"ltr\"><span style=\"font-weight:700\">Nowa</span><span style=\"font-weight:400\"> kolekcja</span></p>\
     <ul><li><p><span style=\"font-style:italic\">Bawełna</span></p></li></ul></b>",
    "**Nowa** kolekcja\n\n- _Bawełna_"
)]
#[case::web_page_divs(
    "<div>First line</div><div><strong>Second</strong> line<br>continued</div>",
    "First line\n\n**Second** line  \ncontinued"
)]
fn test_pasted_sources(#[case] html: &str, #[case] expected: &str) {
    let result = convert_to_markdown(html);
    assert_eq!(result.detected_format, Format::Html);
    assert_eq!(result.markdown, expected);
}

/// Installs two rules in the given order on a CommonMark-only converter.
fn converter_with(first: (&str, pastemark::Rule), second: (&str, pastemark::Rule)) -> MarkdownConverter {
    let mut converter = MarkdownConverter::base(MarkdownOptions::default());
    converter.add_rule(first.0, first.1).add_rule(second.0, second.1);
    converter
}

#[test]
fn test_google_docs_wrapper_must_precede_bold() {
    let html = r#"<b style="font-weight:normal">plain</b>"#;

    let ordered = converter_with(
        ("googleDocsBoldWrapper", google_docs_bold_wrapper_rule()),
        ("bold", bold_rule()),
    );
    assert_eq!(ordered.convert(html).unwrap(), "plain");

    let reversed = converter_with(
        ("bold", bold_rule()),
        ("googleDocsBoldWrapper", google_docs_bold_wrapper_rule()),
    );
    assert_eq!(reversed.convert(html).unwrap(), "**plain**");
}

#[test]
fn test_styled_span_must_precede_plain_span() {
    let html = r#"<span style="font-weight:bold">loud</span>"#;

    let ordered = converter_with(("styledSpan", styled_span_rule()), ("plainSpan", plain_span_rule()));
    assert_eq!(ordered.convert(html).unwrap(), "**loud**");

    let reversed = converter_with(("plainSpan", plain_span_rule()), ("styledSpan", styled_span_rule()));
    assert_eq!(reversed.convert(html).unwrap(), "loud");
}

#[test]
fn test_trim_runs_before_adjacency_repair() {
    // Adjacency repair only recognizes tight spans, so trimming must come first.
    assert_eq!(repair_markdown("word** bold**"), "word\n\n**bold**");
}

#[test]
fn test_list_break_runs_before_marker_spacing() {
    // The list marker only starts a line once the span before it is broken off.
    assert_eq!(
        repair_markdown("**Items**-   one\n1.   two"),
        "**Items**\n\n- one\n1. two"
    );
}

#[test]
fn test_round_trip_keeps_emphasis_and_paragraphs() {
    let html = "<p>Hello <b>world</b> and <i>more</i></p><p>Second paragraph</p>";
    let markdown = convert_to_markdown(html).markdown;
    assert_eq!(markdown, "Hello **world** and _more_\n\nSecond paragraph");

    let rendered = description_to_html(&markdown);
    assert!(rendered.contains("<strong>world</strong>"));
    assert!(rendered.contains("<em>more</em>"));
    assert_eq!(rendered.matches("<p>").count(), 2);
}

#[test]
fn test_stored_html_and_legacy_markdown_render() {
    let stored_html = "<p>New <strong>content</strong></p><p></p>";
    assert!(is_html(stored_html));
    assert_eq!(description_to_html(stored_html), "<p>New <strong>content</strong></p>");

    let legacy = "Old **content**";
    assert!(!is_html(legacy));
    assert_eq!(detect_format(legacy), Format::Markdown);
    assert_eq!(description_to_html(legacy), "<p>Old <strong>content</strong></p>");
}

#[test]
fn test_paste_event() {
    let event = DataTransfer::new().with_data("text/html", "<ul><li>one</li><li>two</li></ul>");
    let result = handle_paste_event(&event).unwrap();
    assert_eq!(result.markdown, "- one\n- two");
}

#[test]
fn test_concurrent_conversions() {
    let inputs = ["<p><b>a</b></p>", "plain", "_md_", "<h2>Title</h2>"];
    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || convert_to_markdown(input).markdown))
            .collect();
        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outputs, vec!["**a**", "plain", "_md_", "## Title"]);
    });
}
