//! Input format detection.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// The format an input string is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Format {
    Html,
    Markdown,
    Plain,
    /// Never produced by [`detect_format`]; only reachable through
    /// [`convert_as`](crate::convert_as), where it means strict pass-through.
    Unknown,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Markdown => "markdown",
            Format::Plain => "plain",
            Format::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opening tag: a tag name, optional attributes, then `>` or `/>`.
///
/// Markdown autolinks (`<https://..>`, `<name@host>`) do not have a tag name shape.
pub(crate) static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<[a-z][a-z0-9-]*(\s[^>]*)?/?>").expect("valid regex"));

static MARKDOWN_SIGNATURES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // ATX heading
        r"(?m)^#{1,6}\s",
        // **bold**
        r"\*\*[^*\n]+\*\*",
        // _italic_
        r"_[^_\n]+_",
        // unordered list
        r"(?m)^\s*[-*+]\s",
        // ordered list
        r"(?m)^\s*\d+\.\s",
        // [text](url)
        r"\[[^\]\n]+\]\([^)\s]+\)",
        // `code`
        r"`[^`\n]+`",
        // fenced code
        r"(?m)^```",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Classify `text` as HTML, Markdown or plain text.
///
/// An HTML tag anywhere wins over Markdown-looking content. Total: every input,
/// including the empty string, gets a format.
pub fn detect_format(text: &str) -> Format {
    let text = text.trim();

    if HTML_TAG.is_match(text) {
        return Format::Html;
    }

    if MARKDOWN_SIGNATURES.iter().any(|re| re.is_match(text)) {
        return Format::Markdown;
    }

    Format::Plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_detected() {
        assert_eq!(detect_format("<p>Hello</p>"), Format::Html);
        assert_eq!(detect_format("text with <span class=\"x\">tag</span>"), Format::Html);
    }

    #[test]
    fn test_html_wins_over_markdown() {
        assert_eq!(detect_format("<p>**bold** and # not a heading</p>"), Format::Html);
    }

    #[test]
    fn test_markdown_signatures() {
        for input in [
            "# Title",
            "###### Deep",
            "some **bold** text",
            "some _italic_ text",
            "- item",
            "* item",
            "1. first",
            "see [docs](https://example.com)",
            "run `cargo`",
            "```\ncode\n```",
        ] {
            assert_eq!(detect_format(input), Format::Markdown, "input: {input:?}");
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(detect_format("Just a sentence."), Format::Plain);
        assert_eq!(detect_format("a < b and c > d"), Format::Plain);
        assert_eq!(detect_format("#hashtag"), Format::Plain);
    }

    #[test]
    fn test_autolinks_are_not_tags() {
        assert_eq!(detect_format("Contact <jan@firma.pl> or <https://example.com>"), Format::Plain);
        assert_eq!(detect_format("<mailto:jan@firma.pl>"), Format::Plain);
        assert_eq!(detect_format("<my-widget data-x=\"1\">"), Format::Html);
    }

    #[test]
    fn test_empty_is_plain() {
        assert_eq!(detect_format(""), Format::Plain);
        assert_eq!(detect_format("   \n\t"), Format::Plain);
    }

    #[test]
    fn test_input_is_trimmed_first() {
        assert_eq!(detect_format("   # Title"), Format::Markdown);
    }

    #[test]
    fn test_display() {
        assert_eq!(Format::Html.to_string(), "html");
        assert_eq!(Format::Unknown.as_str(), "unknown");
    }
}
