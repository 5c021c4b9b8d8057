//! Error types for cb-vapi

use cb_core::ProviderError;
use thiserror::Error;

/// cb-vapi error type
#[derive(Error, Debug)]
pub enum VapiError {
    #[error("Vapi private key not configured")]
    NotConfigured,

    /// Outbound calls need `VAPI_PHONE_NUMBER_ID`
    #[error("Vapi phone number id not configured")]
    PhoneNumberNotConfigured,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, VapiError>;
