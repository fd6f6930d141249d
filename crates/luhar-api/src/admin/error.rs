use thiserror::Error;

/// Errors from the admin backend.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status and a plain-text reason.
    #[error("rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("parse error: {0}")]
    Parse(String),
}
