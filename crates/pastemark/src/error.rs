//! Error types for pastemark operations.

use crate::clipboard::ClipboardError;

/// Message shown to users when neither clipboard read path works.
pub const CLIPBOARD_ACCESS_MESSAGE: &str =
    "Unable to read clipboard content. Please paste the content manually (Ctrl+V / Cmd+V).";

/// Error type for pastemark operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The only error that leaves the conversion core.
    #[error("{}", CLIPBOARD_ACCESS_MESSAGE)]
    ClipboardAccess(#[source] ClipboardError),
}

pub type Result<T> = std::result::Result<T, Error>;
