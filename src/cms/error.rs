//! CMS client error types.

use thiserror::Error;

/// Result type alias for the CMS client.
pub type Result<T> = std::result::Result<T, CmsError>;

/// Errors that can occur while talking to the Prismic API.
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Prismic returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Document not found: {resource}")]
    NotFound { resource: String },

    #[error("Repository API has no master ref")]
    MissingMasterRef,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CmsError {
    /// Whether the error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }
}
