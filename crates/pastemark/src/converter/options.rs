//! Configuration options for HTML to Markdown conversion

use crate::{Error, Result};

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    /// Only works for h1 and h2, falls back to ATX for h3-h6
    Setext,
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    Indented,
    /// Use fenced code blocks (```)
    #[default]
    Fenced,
}

/// Options for the HTML to Markdown converter.
///
/// Links are always emitted inline (`[text](url)`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarkdownOptions {
    /// Heading style (setext or atx)
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Keep whitespace inside inline `<code>` verbatim instead of collapsing it
    pub preformatted_code: bool,

    /// Deepest element nesting the converter will descend into
    pub max_depth: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "---".to_string(),
            bullet_list_marker: '-',
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            preformatted_code: false,
            max_depth: 256,
        }
    }
}

impl MarkdownOptions {
    /// Reject option values the rules cannot produce valid Markdown with.
    pub fn validate(&self) -> Result<()> {
        if self.strong_delimiter.is_empty() {
            return Err(Error::InvalidInput("strong delimiter must not be empty".into()));
        }
        if !matches!(self.em_delimiter, '_' | '*') {
            return Err(Error::InvalidInput(format!(
                "emphasis delimiter must be '_' or '*', got {:?}",
                self.em_delimiter
            )));
        }
        if !matches!(self.bullet_list_marker, '-' | '*' | '+') {
            return Err(Error::InvalidInput(format!(
                "bullet list marker must be '-', '*' or '+', got {:?}",
                self.bullet_list_marker
            )));
        }
        if self.code_block_style == CodeBlockStyle::Fenced && self.fence.len() < 3 {
            return Err(Error::InvalidInput(format!(
                "fence must be at least three characters, got {:?}",
                self.fence
            )));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidInput("max depth must be at least 1".into()));
        }
        Ok(())
    }
}
