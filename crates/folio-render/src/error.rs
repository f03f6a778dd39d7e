//! Error types for the render crate.

use thiserror::Error;

/// Errors that abort the rendering of a paragraph.
///
/// The caller decides whether to skip the paragraph or abort the document.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A start marker appears after the end marker it should open.
    #[error("malformed markup in line [{line}] ({start},{marker_len})")]
    MalformedMarkup {
        /// The offending line, as seen by the segmenter.
        line: String,
        /// Byte offset of the start marker within the remaining text.
        start: usize,
        /// Length in bytes of the start marker.
        marker_len: usize,
    },

    /// Script ranges are inverted, overlap each other, or split a character.
    #[error("malformed script range [{start},{end}): {reason}")]
    MalformedRanges {
        start: usize,
        end: usize,
        reason: &'static str,
    },

    /// A font could not be resolved or loaded.
    #[error("missing font '{font_id}': {reason}")]
    MissingFont { font_id: String, reason: String },

    /// Invalid writer configuration.
    #[error("configuration error: {0}")]
    Config(#[from] folio_core::ConfigError),
}

impl RenderError {
    /// Create a missing-font error.
    pub fn missing_font(font_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingFont {
            font_id: font_id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
