//! Domain errors for the rolodex directory layer.

use thiserror::Error;

/// Domain-level errors that can occur while talking to the directory API.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("directory API returned {status}: {body}")]
    ApiFailure { status: u16, body: String },

    #[error("directory request failed: {0}")]
    Transport(String),

    #[error("malformed directory response: {0}")]
    MalformedResponse(String),

    #[error("API token is not available: {0}")]
    MissingToken(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::MalformedResponse(err.to_string())
    }
}
