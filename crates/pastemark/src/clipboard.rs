//! Clipboard read boundary.
//!
//! The library never touches a platform clipboard itself. Callers inject a
//! [`ClipboardProvider`]: a browser bridge, an OS binding, or a fake in tests.

use async_trait::async_trait;
use tracing::warn;

use crate::{Error, Result};

pub const MIME_HTML: &str = "text/html";
pub const MIME_PLAIN: &str = "text/plain";

/// Why a clipboard capability could not deliver content
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard access is not supported on this platform")]
    Unsupported,

    #[error("failed to read clipboard: {0}")]
    Read(String),
}

/// One clipboard entry with its representations, keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardItem {
    representations: Vec<(String, String)>,
}

impl ClipboardItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a representation
    pub fn with(mut self, mime: &str, data: impl Into<String>) -> Self {
        self.representations.push((mime.to_ascii_lowercase(), data.into()));
        self
    }

    /// Data for a MIME type, if the item carries it
    pub fn get(&self, mime: &str) -> Option<&str> {
        self.representations
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(mime))
            .map(|(_, data)| data.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.representations.iter().map(|(m, _)| m.as_str())
    }
}

/// Platform clipboard capability
#[async_trait]
pub trait ClipboardProvider: Send + Sync {
    /// Structured read of every item with all of its representations.
    async fn read(&self) -> std::result::Result<Vec<ClipboardItem>, ClipboardError>;

    /// Legacy read of plain text only.
    async fn read_text(&self) -> std::result::Result<String, ClipboardError>;
}

/// Read pasteable content from the clipboard.
///
/// Items are visited in order and the first one carrying HTML (preferred) or
/// plain text wins. When the structured read fails or finds neither, the
/// legacy text read is tried. If that fails too the error carries the fixed
/// user-facing message asking for a manual paste.
pub async fn extract_clipboard_content(provider: &dyn ClipboardProvider) -> Result<String> {
    match provider.read().await {
        Ok(items) => {
            let found = items
                .iter()
                .find_map(|item| item.get(MIME_HTML).or_else(|| item.get(MIME_PLAIN)));
            if let Some(content) = found {
                return Ok(content.to_string());
            }
            warn!(items = items.len(), "clipboard holds no HTML or plain text, trying text read");
        }
        Err(err) => {
            warn!(error = %err, "structured clipboard read failed, trying text read");
        }
    }

    provider.read_text().await.map_err(Error::ClipboardAccess)
}
