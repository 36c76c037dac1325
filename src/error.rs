//! Error types for Liferaft

use thiserror::Error;

/// Result type alias for Liferaft operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Liferaft
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// GitHub wants a one-time code that was missing or wrong.
    #[error("Incorrect or missing Two-Factor Auth Code.")]
    TwoFactorRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("GitHub error ({status}): {message}")]
    Github { status: u16, message: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
