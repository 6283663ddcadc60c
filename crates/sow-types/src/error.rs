//! Error types for Sow Brand tools

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Remote backend is not configured: {0}")]
    MissingRemote(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required field is missing or a value is out of range.
    #[error("{0}")]
    Validation(String),

    /// The draft store or the document library failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted draft could not be interpreted as a document.
    #[error("Malformed draft: {0}")]
    MalformedDraft(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Print error: {0}")]
    Print(String),
}

impl Error {
    /// True for failures the user can fix by completing the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
