//! Error types for flatmark
//!
//! Every failure surfaces as a [`FlatmarkError`]; the core performs no
//! retries and leaves user-visible mapping (HTTP status codes) to the
//! caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during flatmark operations
#[derive(Error, Debug)]
pub enum FlatmarkError {
    /// Title contains a forbidden character (`<>:"/\|?*`, newline,
    /// carriage return, or tab)
    #[error("invalid title: {title:?}")]
    TitleInvalid { title: String },

    /// Attempt to create or rename into an occupied title
    #[error("title already exists: {title:?}")]
    TitleExists { title: String },

    /// Title has no backing file
    #[error("note not found: {title:?}")]
    NotFound { title: String },

    /// The notes path handed to open is not a directory
    #[error("not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    /// Any other filesystem failure, carried as-is
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlatmarkError {
    /// Create an invalid-title error
    pub fn title_invalid(title: impl Into<String>) -> Self {
        FlatmarkError::TitleInvalid {
            title: title.into(),
        }
    }

    /// Create an occupied-title error
    pub fn title_exists(title: impl Into<String>) -> Self {
        FlatmarkError::TitleExists {
            title: title.into(),
        }
    }

    /// Create a missing-note error
    pub fn not_found(title: impl Into<String>) -> Self {
        FlatmarkError::NotFound {
            title: title.into(),
        }
    }
}

/// Result type alias for flatmark operations
pub type Result<T> = std::result::Result<T, FlatmarkError>;
