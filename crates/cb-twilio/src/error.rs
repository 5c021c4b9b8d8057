//! Error types for cb-twilio

use cb_core::ProviderError;
use thiserror::Error;

/// cb-twilio error type
#[derive(Error, Debug)]
pub enum TwilioError {
    #[error("Twilio credentials not configured")]
    NotConfigured,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TwilioError>;
