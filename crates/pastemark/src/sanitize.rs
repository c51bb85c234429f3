//! Trimming of structurally empty paragraphs around editor HTML.

use once_cell::sync::Lazy;
use regex::Regex;

/// Empty editor documents: `<p></p>` and `<p><br></p>`.
static EMPTY_DOCUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^<p>\s*(<br\s*/?>)?\s*</p>$").expect("valid regex"));

static TRAILING_EMPTY_PARAGRAPHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\s*<p(\s[^>]*)?>\s*(<br[^>]*>)?\s*</p>)+\s*$").expect("valid regex")
});

static LEADING_EMPTY_PARAGRAPHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(<p(\s[^>]*)?>\s*(<br[^>]*>)?\s*</p>\s*)+").expect("valid regex")
});

/// Strip empty leading/trailing paragraphs from editor HTML.
///
/// Idempotent: `sanitize_html(&sanitize_html(x)) == sanitize_html(x)`.
pub fn sanitize_html(html: &str) -> String {
    let trimmed = html.trim();
    if trimmed.is_empty() || EMPTY_DOCUMENT.is_match(trimmed) {
        return String::new();
    }

    let without_trailing = TRAILING_EMPTY_PARAGRAPHS.replace(trimmed, "");
    let without_leading = LEADING_EMPTY_PARAGRAPHS.replace(&without_trailing, "");

    without_leading.trim().to_string()
}
