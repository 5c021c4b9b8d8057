//! Error types for cb-email

use cb_core::ProviderError;
use thiserror::Error;

/// cb-email error type
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SendGrid API key not configured")]
    NotConfigured,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EmailError>;
