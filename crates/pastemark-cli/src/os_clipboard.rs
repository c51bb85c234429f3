//! Desktop clipboard provider backed by clipboard-rs.

use async_trait::async_trait;
use clipboard_rs::{Clipboard as _, ClipboardContext, ContentFormat};
use pastemark::clipboard::{MIME_HTML, MIME_PLAIN};
use pastemark::{ClipboardError, ClipboardItem, ClipboardProvider};

pub struct OsClipboard;

fn context() -> Result<ClipboardContext, ClipboardError> {
    ClipboardContext::new().map_err(|e| ClipboardError::Read(e.to_string()))
}

#[async_trait]
impl ClipboardProvider for OsClipboard {
    async fn read(&self) -> Result<Vec<ClipboardItem>, ClipboardError> {
        let ctx = context()?;
        let mut item = ClipboardItem::new();
        if ctx.has(ContentFormat::Html) {
            let html = ctx.get_html().map_err(|e| ClipboardError::Read(e.to_string()))?;
            item = item.with(MIME_HTML, html);
        }
        if ctx.has(ContentFormat::Text) {
            let text = ctx.get_text().map_err(|e| ClipboardError::Read(e.to_string()))?;
            item = item.with(MIME_PLAIN, text);
        }
        Ok(vec![item])
    }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        context()?
            .get_text()
            .map_err(|e| ClipboardError::Read(e.to_string()))
    }
}
