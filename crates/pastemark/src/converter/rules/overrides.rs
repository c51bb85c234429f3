//! Override rules for content pasted from word processors and web pages.
//!
//! These run before the GFM and CommonMark rules, top to bottom, first match
//! wins. Several filters overlap on purpose, so the order below is part of
//! the behavior: moving a rule changes output without any error.

use scraper::ElementRef;

use super::commonmark::heading_level;
use super::{Filter, Rule};
use crate::converter::style::InlineStyle;
use crate::converter::utilities::parent_tag;

/// The override rules with their keys, in dispatch order.
pub fn override_rules() -> Vec<(&'static str, Rule)> {
    vec![
        // Must precede "bold": Google Docs wraps the whole paste in
        // <b style="font-weight:normal">, which is not bold at all.
        ("googleDocsBoldWrapper", google_docs_bold_wrapper_rule()),
        // Must precede "plainSpan": Docs and Word express bold and italic as
        // styled spans rather than <b>/<i>.
        ("styledSpan", styled_span_rule()),
        ("bold", bold_rule()),
        ("italic", italic_rule()),
        ("lineBreak", line_break_rule()),
        // Web pages use <div> where a paragraph was meant.
        ("divParagraph", div_paragraph_rule()),
        ("plainSpan", plain_span_rule()),
        // The base list rule pads sublists with blank lines, which breaks
        // their indentation under the parent item.
        ("nestedList", nested_list_rule()),
        ("heading", heading_rule()),
        // Empty paragraphs from editors must not leave blank lines behind.
        ("paragraph", paragraph_rule()),
    ]
}

fn inline_style(node: &ElementRef) -> InlineStyle {
    node.value()
        .attr("style")
        .map(InlineStyle::parse)
        .unwrap_or_default()
}

/// `<b>`/`<strong>` whose inline style sets a normal weight: content only.
pub fn google_docs_bold_wrapper_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["b", "strong"], |node, _| {
            inline_style(node).is_normal_weight()
        }),
        |_, content, _| content.to_string(),
    )
}

/// `<span>` with an inline `font-weight` or `font-style`.
pub fn styled_span_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["span"], |node, _| !inline_style(node).is_empty()),
        |node, content, options| {
            if content.trim().is_empty() {
                return content.to_string();
            }
            let style = inline_style(node);

            let mut output = content.to_string();
            if style.is_italic() {
                output = format!("{0}{1}{0}", options.em_delimiter, output);
            }
            if style.is_bold() {
                output = format!("{0}{1}{0}", options.strong_delimiter, output);
            }
            output
        },
    )
}

pub fn bold_rule() -> Rule {
    Rule::for_tags(&["b", "strong"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("{0}{1}{0}", options.strong_delimiter, content)
    })
}

pub fn italic_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("{0}{1}{0}", options.em_delimiter, content)
    })
}

/// `<br>` as a Markdown hard break.
pub fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

pub fn div_paragraph_rule() -> Rule {
    Rule::for_tag("div", |_, content, _| format!("\n\n{}\n\n", content))
}

/// Any `<span>` left over: the tag is dropped.
pub fn plain_span_rule() -> Rule {
    Rule::for_tag("span", |_, content, _| content.to_string())
}

/// `<ul>`/`<ol>` directly inside an `<li>`.
pub fn nested_list_rule() -> Rule {
    Rule::new(
        Filter::tags_where(&["ul", "ol"], |node, _| parent_tag(node) == Some("li")),
        |_, content, _| format!("\n{}", content),
    )
}

/// ATX headings regardless of the configured heading style.
pub fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{} {}\n\n", "#".repeat(heading_level(node)), content)
    })
}

pub fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", content)
    })
}
