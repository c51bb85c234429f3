//! Paste event handling.

use indexmap::IndexMap;

use crate::clipboard::{MIME_HTML, MIME_PLAIN};
use crate::pipeline::{convert_to_markdown, ConversionResult};

/// Synchronous access to the data carried by a paste event.
pub trait PasteData {
    /// Data for a MIME type, `None` when the event does not carry it
    fn get_data(&self, format: &str) -> Option<String>;
}

/// In-memory paste payload, keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    data: IndexMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, format: &str, data: impl Into<String>) -> Self {
        self.set_data(format, data);
        self
    }

    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        self.data.insert(format.to_ascii_lowercase(), data.into());
    }
}

impl PasteData for DataTransfer {
    fn get_data(&self, format: &str) -> Option<String> {
        self.data.get(&format.to_ascii_lowercase()).cloned()
    }
}

/// Convert the content of a paste event.
///
/// HTML is preferred over plain text; empty representations are ignored.
/// Returns `None` when the event carries neither.
pub fn handle_paste_event(event: &dyn PasteData) -> Option<ConversionResult> {
    let content = [MIME_HTML, MIME_PLAIN]
        .into_iter()
        .filter_map(|format| event.get_data(format))
        .find(|data| !data.is_empty())?;

    Some(convert_to_markdown(&content))
}
