//! Top-level conversion: detect the input format, then run its branch.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::converter::MarkdownConverter;
use crate::format::{detect_format, Format};
use crate::html::html_to_text;
use crate::normalize::normalize_html;
use crate::repair::repair_markdown;

/// Outcome of a single [`convert_to_markdown`] call.
///
/// Lengths count Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConversionResult {
    pub markdown: String,
    pub detected_format: Format,
    pub original_length: usize,
    pub converted_length: usize,
}

static CONVERTER: Lazy<MarkdownConverter> = Lazy::new(MarkdownConverter::new);

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s<>()\[\]]+").expect("valid regex"));

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)[•·▪◦‣–—][ \t]*").expect("valid regex"));

static PAREN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)(\d+)\)[ \t]+").expect("valid regex"));

/// Detect the format of `text` and convert it to Markdown.
///
/// Never fails: every input, including the empty string, produces a result.
pub fn convert_to_markdown(text: &str) -> ConversionResult {
    let format = detect_format(text);
    debug!(format = %format, length = text.len(), "detected input format");
    convert_as(text, format)
}

/// Convert `text` as if it had been detected as `format`.
///
/// - `Html`: normalize, convert, repair
/// - `Markdown`: repair only
/// - `Plain`: link bare URLs and normalize list bullets, then repair
/// - `Unknown`: trimmed, otherwise passed through unchanged
pub fn convert_as(text: &str, format: Format) -> ConversionResult {
    convert_as_with(text, format, &CONVERTER)
}

/// [`convert_as`] with a caller-configured HTML converter.
pub fn convert_as_with(text: &str, format: Format, converter: &MarkdownConverter) -> ConversionResult {
    let markdown = match format {
        Format::Html => convert_html(text, converter),
        Format::Markdown => repair_markdown(text),
        Format::Plain => repair_markdown(&format_plain_text(text)),
        Format::Unknown => text.trim().to_string(),
    };

    ConversionResult {
        original_length: text.chars().count(),
        converted_length: markdown.chars().count(),
        markdown,
        detected_format: format,
    }
}

/// Convert pasted HTML to Markdown.
#[deprecated(note = "use `convert_to_markdown` or `convert_as(html, Format::Html)`")]
pub fn html_to_markdown(html: &str) -> String {
    convert_html(html, &CONVERTER)
}

fn convert_html(html: &str, converter: &MarkdownConverter) -> String {
    let normalized = normalize_html(html);
    let markdown = match converter.convert(&normalized) {
        Ok(markdown) => markdown,
        Err(err) => {
            warn!(error = %err, "HTML conversion failed, falling back to plain text");
            html_to_text(&normalized)
        }
    };
    repair_markdown(&markdown)
}

fn format_plain_text(text: &str) -> String {
    let text = URL.replace_all(text.trim(), |caps: &Captures| {
        let url = &caps[0];
        let link = url.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        format!("[{0}]({0}){1}", link, &url[link.len()..])
    });
    let text = BULLET.replace_all(&text, "${1}- ");
    PAREN_NUMBER.replace_all(&text, "${1}${2}. ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::MarkdownOptions;

    #[test]
    fn test_empty_input() {
        let result = convert_to_markdown("");
        assert_eq!(
            result,
            ConversionResult {
                markdown: String::new(),
                detected_format: Format::Plain,
                original_length: 0,
                converted_length: 0,
            }
        );
    }

    #[test]
    fn test_html_branch() {
        let result = convert_to_markdown("<p>Hello <b>world</b></p>");
        assert_eq!(result.detected_format, Format::Html);
        assert_eq!(result.markdown, "Hello **world**");
        assert_eq!(result.original_length, 25);
        assert_eq!(result.converted_length, 15);
    }

    #[test]
    fn test_markdown_branch_repairs() {
        let result = convert_to_markdown("word**bold**");
        assert_eq!(result.detected_format, Format::Markdown);
        assert_eq!(result.markdown, "word\n\n**bold**");
    }

    #[test]
    fn test_plain_text_links() {
        assert_eq!(
            format_plain_text("Check https://example.com now"),
            "Check [https://example.com](https://example.com) now"
        );
        assert_eq!(
            format_plain_text("See https://example.com/a?b=1."),
            "See [https://example.com/a?b=1](https://example.com/a?b=1)."
        );
    }

    #[test]
    fn test_link_with_underscores_survives_repair() {
        let result = convert_to_markdown(r#"<a href="https://x.com/my_file_.pdf">f</a>"#);
        assert_eq!(result.markdown, "[f](https://x.com/my_file_.pdf)");
    }

    #[test]
    fn test_plain_text_lists() {
        assert_eq!(format_plain_text("• one\n• two"), "- one\n- two");
        assert_eq!(format_plain_text("1) first\n2) second"), "1. first\n2. second");
    }

    #[test]
    fn test_unknown_is_pass_through() {
        let result = convert_as("  word**bold** https://x.y  ", Format::Unknown);
        assert_eq!(result.markdown, "word**bold** https://x.y");
        assert_eq!(result.detected_format, Format::Unknown);
    }

    #[test]
    fn test_deep_nesting_falls_back_to_text() {
        let html = format!("{}deep{}", "<div>".repeat(300), "</div>".repeat(300));
        let result = convert_as(&html, Format::Html);
        assert_eq!(result.markdown, "deep");
    }

    #[test]
    fn test_configured_converter() {
        let converter = MarkdownConverter::with_options(MarkdownOptions {
            em_delimiter: '*',
            ..Default::default()
        });
        let result = convert_as_with("<p><em>soft</em></p>", Format::Html, &converter);
        assert_eq!(result.markdown, "*soft*");
    }

    #[test]
    #[allow(deprecated)]
    fn test_deprecated_alias_matches_html_branch() {
        let html = "<p><i>legacy</i> call</p>";
        assert_eq!(html_to_markdown(html), convert_as(html, Format::Html).markdown);
    }
}
