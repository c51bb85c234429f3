//! Markdown to HTML rendering for stored values.

use std::panic::{self, AssertUnwindSafe};

use pulldown_cmark::{html, Event, Options, Parser};
use tracing::warn;

use crate::gate::is_html;
use crate::sanitize::sanitize_html;

/// Render a stored value as HTML.
///
/// Values that are already HTML are only sanitized. Anything else is parsed
/// as GitHub-flavored Markdown with every line break treated as a hard
/// break. Never fails.
pub fn markdown_to_html(content: &str) -> String {
    if is_html(content) {
        return sanitize_html(content);
    }

    match panic::catch_unwind(AssertUnwindSafe(|| render_gfm(content))) {
        Ok(rendered) => rendered,
        Err(_) => {
            warn!("markdown rendering panicked, falling back to plain paragraphs");
            naive_html(content)
        }
    }
}

/// Render a product description for display or for loading into an editor.
///
/// Same behavior as [`markdown_to_html`].
pub fn description_to_html(content: &str) -> String {
    markdown_to_html(content)
}

fn render_gfm(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

/// Blank-line separated blocks become paragraphs, single newlines `<br>`.
fn naive_html(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| format!("<p>{}</p>", block.replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("")
}
