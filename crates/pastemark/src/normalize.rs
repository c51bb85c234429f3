//! Source-specific cleanup of pasted HTML before tree conversion.
//!
//! Google Docs wraps the whole clipboard payload in
//! `<b style="font-weight:normal" id="docs-internal-guid-…">`, Word sprinkles
//! `<o:p>` namespace tags and `StartFragment` comments, and every source uses
//! non-breaking spaces liberally. None of that should reach the converter.

use once_cell::sync::Lazy;
use regex::Regex;

/// The outermost Google Docs wrapper, anchored to the end of the payload.
static GOOGLE_DOCS_WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<b\s[^>]*style\s*=\s*["'][^"']*font-weight\s*:\s*(normal|400)[^>]*>(.*)</b>\s*$"#)
        .expect("valid regex")
});

static OFFICE_NAMESPACE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<o:p\s*/>|<o:p>.*?</o:p>").expect("valid regex"));

static META_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<meta[^>]*>").expect("valid regex"));

static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static NBSP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&nbsp;|&#160;|&#xa0;|\x{00A0}").expect("valid regex"));

static LINE_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").expect("valid regex"));

static EMPTY_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<p(\s[^>]*)?>\s*</p>").expect("valid regex"));

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Clean up pasted HTML.
///
/// Pure and idempotent on already-normalized input.
pub fn normalize_html(html: &str) -> String {
    let html = strip_google_docs_wrapper(html);
    let html = OFFICE_NAMESPACE_TAG.replace_all(&html, "");
    let html = META_TAG.replace_all(&html, "");
    let html = STYLE_BLOCK.replace_all(&html, "");
    let html = COMMENT.replace_all(&html, "");
    let html = NBSP.replace_all(&html, " ");
    let html = LINE_ENDING.replace_all(&html, "\n");
    let html = EMPTY_PARAGRAPH.replace_all(&html, "");
    let html = EXCESS_NEWLINES.replace_all(&html, "\n\n");

    html.trim().to_string()
}

/// Remove the outer Google Docs `<b style="font-weight:normal">` wrapper.
///
/// Only the first such tag is considered, and only when its closing `</b>`
/// ends the payload; everything before the wrapper (usually `<meta>`) is kept.
fn strip_google_docs_wrapper(html: &str) -> String {
    match GOOGLE_DOCS_WRAPPER.captures(html) {
        Some(caps) => {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(2)) else {
                return html.to_string();
            };
            let mut out = String::with_capacity(html.len());
            out.push_str(&html[..whole.start()]);
            out.push_str(inner.as_str());
            out
        }
        None => html.to_string(),
    }
}
