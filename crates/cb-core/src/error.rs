//! Error types for cb-core

use thiserror::Error;

/// Main error type for cb-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Completion API error: {0}")]
    CompletionApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for cb-core
pub type Result<T> = std::result::Result<T, Error>;
