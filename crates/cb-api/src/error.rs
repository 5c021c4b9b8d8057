//! Error types for cb-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use cb_core::{ProviderError, ProviderErrorKind};
use cb_email::EmailError;
use cb_twilio::TwilioError;
use cb_vapi::VapiError;

/// cb-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Provider(e) => match e.kind {
                ProviderErrorKind::InvalidParameters
                | ProviderErrorKind::InvalidCredentials
                | ProviderErrorKind::InsufficientPermissions => StatusCode::BAD_REQUEST,
                ProviderErrorKind::ProviderUnavailable | ProviderErrorKind::GenericFailure => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "not-configured",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not-found",
            Self::Provider(e) => e.kind.as_str(),
            Self::Internal(_) => "internal",
        }
    }
}

impl From<TwilioError> for ApiError {
    fn from(err: TwilioError) -> Self {
        match err {
            TwilioError::NotConfigured => Self::NotConfigured("Twilio"),
            TwilioError::Validation(msg) => Self::Validation(msg),
            TwilioError::Provider(e) => Self::Provider(e),
            TwilioError::Config(msg) => Self::Internal(msg),
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::NotConfigured => Self::NotConfigured("SendGrid"),
            EmailError::Validation(msg) => Self::Validation(msg),
            EmailError::Provider(e) => Self::Provider(e),
            EmailError::Config(msg) => Self::Internal(msg),
        }
    }
}

impl From<VapiError> for ApiError {
    fn from(err: VapiError) -> Self {
        match err {
            VapiError::NotConfigured => Self::NotConfigured("Vapi"),
            VapiError::Validation(msg) => Self::Validation(msg),
            VapiError::PhoneNumberNotConfigured => Self::NotConfigured("Vapi phone number"),
            VapiError::Provider(e) => Self::Provider(e),
            VapiError::Config(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        }

        let details = match &self {
            Self::Provider(e) => e.details.clone().unwrap_or(Value::Null),
            _ => Value::Null,
        };
        let body = json!({
            "success": false,
            "message": self.to_string(),
            "kind": self.kind(),
            "error": details,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(status: u16) -> ApiError {
        ApiError::Provider(ProviderError::from_response("Twilio", status, "{}", "Failed"))
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(provider(400).status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider(401).status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider(403).status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider(503).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(provider(404).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::from(TwilioError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(EmailError::Validation("to".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_vapi_config_errors() {
        let missing = ApiError::from(VapiError::PhoneNumberNotConfigured);
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(missing.kind(), "not-configured");

        let broken = ApiError::from(VapiError::Config("tls backend unavailable".into()));
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.kind(), "internal");
    }

    #[test]
    fn test_message_is_provider_message() {
        let err = provider(401);
        assert_eq!(err.to_string(), "Invalid Twilio credentials");
        assert_eq!(err.kind(), "invalid-credentials");
    }
}
