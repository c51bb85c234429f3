//! # pastemark
//!
//! Normalize rich text pasted from Word, Google Docs and web pages into Markdown,
//! and render stored Markdown (or pass through stored HTML) for display.
//!
//! The crate is a set of pure, stateless string transformations:
//!
//! ```text
//!            ┌─────────┐  html   ┌───────────┐   ┌───────────┐   ┌────────┐
//! input ───▶ │ detect  │ ──────▶ │ normalize │ ─▶│ converter │ ─▶│ repair │ ──▶ Markdown
//!            └─────────┘         └───────────┘   └───────────┘   └────────┘
//!                 │ markdown / plain                                  ▲
//!                 └───────────────────────────────────────────────────┘
//!
//! stored value ─▶ is_html? ── yes ─▶ sanitize ─────────────▶ HTML
//!                          └─ no ──▶ markdown_to_html ─────▶ HTML
//! ```
//!
//! The clipboard boundary ([`clipboard`]) is the only fallible, asynchronous part,
//! and it reaches the platform through an injected [`ClipboardProvider`].
//!
//! ## Example
//!
//! ```rust
//! use pastemark::{convert_to_markdown, Format};
//!
//! let result = convert_to_markdown("<p>Hello <b>world</b></p>");
//! assert_eq!(result.detected_format, Format::Html);
//! assert_eq!(result.markdown, "Hello **world**");
//! ```
//!
//! ## Example (reverse path)
//!
//! ```rust
//! use pastemark::{description_to_html, sanitize_html};
//!
//! let html = description_to_html("**Legacy** description");
//! assert!(html.contains("<strong>Legacy</strong>"));
//!
//! assert_eq!(sanitize_html("<p></p>"), "");
//! ```

pub mod clipboard;
pub mod converter;
mod error;
pub mod format;
mod gate;
pub mod html;
pub mod normalize;
pub mod paste;
mod pipeline;
mod render;
pub mod repair;
mod sanitize;

pub use clipboard::{extract_clipboard_content, ClipboardError, ClipboardItem, ClipboardProvider};
pub use converter::{
    CodeBlockStyle, Filter, HeadingStyle, MarkdownConverter, MarkdownOptions, Rule, Rules,
};
pub use error::{Error, Result, CLIPBOARD_ACCESS_MESSAGE};
pub use format::{detect_format, Format};
pub use gate::is_html;
pub use html::html_to_text;
pub use normalize::normalize_html;
pub use paste::{handle_paste_event, DataTransfer, PasteData};
#[allow(deprecated)]
pub use pipeline::html_to_markdown;
pub use pipeline::{convert_as, convert_as_with, convert_to_markdown, ConversionResult};
pub use render::{description_to_html, markdown_to_html};
pub use repair::repair_markdown;
pub use sanitize::sanitize_html;
