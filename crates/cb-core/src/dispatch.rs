//! Provider dispatch types
//!
//! Every outbound provider call (voice, SMS, WhatsApp, email, voice-AI)
//! resolves to either a [`DispatchResult`] or a [`ProviderError`] classified
//! by the provider's HTTP status.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Outbound communication channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Voice,
    Sms,
    WhatsApp,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Voice => "voice",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
            Self::Email => "email",
        };
        f.write_str(name)
    }
}

/// Classification of a failed provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderErrorKind {
    /// 400
    InvalidParameters,
    /// 401
    InvalidCredentials,
    /// 403
    InsufficientPermissions,
    /// >= 500
    ProviderUnavailable,
    /// Anything else, including transport failures
    GenericFailure,
}

impl ProviderErrorKind {
    /// Map a provider HTTP status to an error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidParameters,
            401 => Self::InvalidCredentials,
            403 => Self::InsufficientPermissions,
            s if s >= 500 => Self::ProviderUnavailable,
            _ => Self::GenericFailure,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidParameters => "invalid-parameters",
            Self::InvalidCredentials => "invalid-credentials",
            Self::InsufficientPermissions => "insufficient-permissions",
            Self::ProviderUnavailable => "provider-unavailable",
            Self::GenericFailure => "generic-failure",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider rejected or failed a request
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// HTTP status returned by the provider, if one was received
    pub status: Option<u16>,
    /// Provider error payload (JSON body, or the raw text/transport message)
    pub details: Option<Value>,
}

impl ProviderError {
    /// Build an error from a non-success provider response.
    ///
    /// `provider` names the vendor in user-facing messages and `context`
    /// describes the failed operation.
    pub fn from_response(provider: &str, status: u16, body: &str, context: &str) -> Self {
        let kind = ProviderErrorKind::from_status(status);
        let message = match kind {
            ProviderErrorKind::InvalidParameters => "Invalid request parameters".to_string(),
            ProviderErrorKind::InvalidCredentials => format!("Invalid {} credentials", provider),
            ProviderErrorKind::InsufficientPermissions => {
                "Insufficient permissions or account suspended".to_string()
            }
            ProviderErrorKind::ProviderUnavailable => {
                format!("{} service temporarily unavailable", provider)
            }
            ProviderErrorKind::GenericFailure => context.to_string(),
        };

        Self {
            kind,
            message,
            status: Some(status),
            details: Some(parse_body(body)),
        }
    }

    /// Build an error for a request that never produced a response
    pub fn transport(err: &reqwest::Error, context: &str) -> Self {
        Self {
            kind: ProviderErrorKind::GenericFailure,
            message: context.to_string(),
            status: None,
            details: Some(Value::String(err.to_string())),
        }
    }
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Read a provider response, returning its JSON body on success.
///
/// Empty bodies (e.g. `202 Accepted`) come back as `Value::Null`.
pub async fn read_response(
    provider: &str,
    response: reqwest::Response,
    context: &str,
) -> Result<Value, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::transport(&e, context))?;

    if !status.is_success() {
        let err = ProviderError::from_response(provider, status.as_u16(), &body, context);
        warn!(
            "{} error ({}): {} - {}",
            provider,
            err.kind,
            status,
            body.chars().take(500).collect::<String>()
        );
        return Err(err);
    }

    debug!("{} response: {}", provider, status);
    Ok(parse_body(&body))
}

/// Uniform result of a provider call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchResult {
    pub success: bool,
    /// Provider-assigned identifier (call SID, message SID, call id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub message: String,
    /// Raw provider payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl DispatchResult {
    /// Successful result carrying the provider payload
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        let sid = data
            .get("sid")
            .or_else(|| data.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            success: true,
            sid,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }
}

impl From<&ProviderError> for DispatchResult {
    fn from(err: &ProviderError) -> Self {
        Self {
            success: false,
            sid: None,
            message: err.message.clone(),
            data: None,
            error: err.details.clone(),
        }
    }
}

/// Aggregate counts of a bulk send
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Outcome for one recipient of a bulk send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkItem {
    pub phone_number: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Itemized bulk report. Successes land in `results`, failures in `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BulkReport {
    pub summary: BulkSummary,
    pub results: Vec<BulkItem>,
    pub errors: Vec<BulkItem>,
}

impl BulkReport {
    pub fn new(total: usize) -> Self {
        Self {
            summary: BulkSummary {
                total,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, phone_number: &str, payload: &Value) {
        self.summary.successful += 1;
        self.results.push(BulkItem {
            phone_number: phone_number.to_string(),
            success: true,
            message_sid: payload.get("sid").and_then(Value::as_str).map(str::to_string),
            status: payload
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_string),
            error: None,
        });
    }

    pub fn record_failure(&mut self, phone_number: &str, error: Value) {
        self.summary.failed += 1;
        self.errors.push(BulkItem {
            phone_number: phone_number.to_string(),
            success: false,
            message_sid: None,
            status: None,
            error: Some(error),
        });
    }

    /// Overall success: at least one recipient was reached
    pub fn any_succeeded(&self) -> bool {
        self.summary.successful > 0
    }

    /// Wrap the report into a [`DispatchResult`]
    pub fn into_result(self, label: &str) -> DispatchResult {
        let message = format!(
            "{} completed. {} sent, {} failed.",
            label, self.summary.successful, self.summary.failed
        );
        let success = self.any_succeeded();
        DispatchResult {
            success,
            sid: None,
            message,
            data: serde_json::to_value(&self).ok(),
            error: None,
        }
    }
}
