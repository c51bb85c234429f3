//! Routing of stored values: native HTML or legacy Markdown.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::HTML_TAG;

static LEADING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^<[a-z][a-z0-9]*(\s[^>]*)?/?>").expect("valid regex"));

static KNOWN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(p|h[1-6]|ul|ol|li|blockquote|pre|div|br|strong|em|u|s|del|a|table)(\s[^>]*)?/?>")
        .expect("valid regex")
});

/// Decide whether a stored value is already HTML.
///
/// A heuristic, not a parse. Anything [`detect_format`](crate::detect_format)
/// calls HTML is HTML here too.
pub fn is_html(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    LEADING_TAG.is_match(trimmed) || KNOWN_TAG.is_match(trimmed) || HTML_TAG.is_match(trimmed)
}
