//! Error type shared by the core crate.

use thiserror::Error;

/// Errors raised by page storage, layout edits and media uploads.
///
/// Silent editor outcomes (an add past capacity, a move at the array edge)
/// are not errors and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid page name '{0}': use letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("No layout object at index {index} (page holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

pub type Result<T> = std::result::Result<T, Error>;
