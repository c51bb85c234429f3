//! Plain-text extraction from HTML fragments.

use scraper::Html;

use crate::converter::utilities::collapse_whitespace;

/// Return the text content of an HTML fragment.
///
/// Tags are dropped, entities decoded, and runs of whitespace collapsed into
/// single spaces. Never fails: malformed markup is repaired by the parser.
///
/// # Example
///
/// ```rust
/// use pastemark::html_to_text;
///
/// assert_eq!(html_to_text("<p>Hello <b>world</b> &amp; co</p>"), "Hello world & co");
/// ```
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text).trim().to_string()
}
