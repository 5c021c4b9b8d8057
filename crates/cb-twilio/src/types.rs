//! Request and webhook payloads

use serde::{Deserialize, Deserializer, Serialize};

/// Outbound voice call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub to: String,
    /// Caller id. Blank means the configured Twilio number.
    #[serde(default)]
    pub from: String,
    /// TwiML URL driving the call
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status_callback: Option<String>,
    #[serde(default)]
    pub status_callback_method: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub record: Option<String>,
    /// Ring timeout in seconds
    #[serde(default, deserialize_with = "flexible_string")]
    pub timeout: Option<String>,
}

/// Outbound SMS
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsRequest {
    pub to: String,
    /// Sender. Blank means the configured Twilio number.
    #[serde(default)]
    pub from: String,
    pub body: String,
    #[serde(default)]
    pub status_callback: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}

/// Outbound WhatsApp message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppRequest {
    pub to: String,
    /// Sender. Blank means the configured WhatsApp number.
    #[serde(default)]
    pub from: String,
    pub body: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub status_callback: Option<String>,
}

/// Same WhatsApp message to many recipients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWhatsAppRequest {
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub from: String,
    pub body: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub status_callback: Option<String>,
    /// Seconds between consecutive sends. Accepts `2` or `"2"`.
    #[serde(default, deserialize_with = "flexible_string")]
    pub delay_between_messages: Option<String>,
}

/// Upper bound on a caller-supplied delay between bulk sends
pub const MAX_BULK_DELAY_SECS: u64 = 60;

impl BulkWhatsAppRequest {
    /// Requested delay, if present and numeric, capped at
    /// [`MAX_BULK_DELAY_SECS`]
    pub fn delay_secs(&self) -> Option<u64> {
        self.delay_between_messages
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| (d.round() as u64).min(MAX_BULK_DELAY_SECS))
    }
}

/// Form fields Twilio posts to status, voice and inbound-message webhooks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TwilioWebhook {
    pub call_sid: Option<String>,
    pub message_sid: Option<String>,
    pub account_sid: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub body: Option<String>,
    pub call_status: Option<String>,
    pub message_status: Option<String>,
    pub sms_status: Option<String>,
    pub digits: Option<String>,
    pub recording_url: Option<String>,
    pub recording_sid: Option<String>,
    pub recording_duration: Option<String>,
    pub call_duration: Option<String>,
    pub error_code: Option<String>,
}

impl TwilioWebhook {
    /// Delivery status of a message callback
    pub fn delivery_status(&self) -> Option<&str> {
        self.message_status
            .as_deref()
            .or(self.sms_status.as_deref())
    }
}

/// Accept a JSON string, number or bool and keep it as text
fn flexible_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Flexible>::deserialize(deserializer)?.map(|v| match v {
        Flexible::Text(s) => s,
        Flexible::Int(n) => n.to_string(),
        Flexible::Float(n) => n.to_string(),
        Flexible::Bool(b) => b.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_delay_accepts_number_or_string() {
        let req: BulkWhatsAppRequest = serde_json::from_str(
            r#"{"phoneNumbers": ["+14155550100"], "from": "+14155550101", "body": "hi", "delayBetweenMessages": 3}"#,
        )
        .unwrap();
        assert_eq!(req.delay_secs(), Some(3));

        let req: BulkWhatsAppRequest = serde_json::from_str(
            r#"{"phoneNumbers": [], "body": "hi", "delayBetweenMessages": "5"}"#,
        )
        .unwrap();
        assert_eq!(req.delay_secs(), Some(5));

        let req: BulkWhatsAppRequest =
            serde_json::from_str(r#"{"phoneNumbers": [], "body": "hi"}"#).unwrap();
        assert_eq!(req.delay_secs(), None);
    }

    #[test]
    fn test_bulk_delay_is_capped() {
        let req: BulkWhatsAppRequest = serde_json::from_str(
            r#"{"phoneNumbers": ["+14155550100"], "body": "hi", "delayBetweenMessages": 1e9}"#,
        )
        .unwrap();
        assert_eq!(req.delay_secs(), Some(MAX_BULK_DELAY_SECS));

        let req = BulkWhatsAppRequest {
            delay_between_messages: Some("61".into()),
            ..Default::default()
        };
        assert_eq!(req.delay_secs(), Some(60));
    }

    #[test]
    fn test_bulk_delay_rejects_garbage() {
        let req = BulkWhatsAppRequest {
            delay_between_messages: Some("soon".into()),
            ..Default::default()
        };
        assert_eq!(req.delay_secs(), None);
    }

    #[test]
    fn test_call_request_flexible_fields() {
        let req: CallRequest = serde_json::from_str(
            r#"{"to": "+14155550100", "from": "+14155550101", "record": true, "timeout": 30}"#,
        )
        .unwrap();
        assert_eq!(req.record.as_deref(), Some("true"));
        assert_eq!(req.timeout.as_deref(), Some("30"));
    }

    #[test]
    fn test_webhook_pascal_case() {
        let hook: TwilioWebhook = serde_json::from_str(
            r#"{"CallSid": "CA1", "Digits": "5", "From": "+14155550100", "Unknown": "x"}"#,
        )
        .unwrap();
        assert_eq!(hook.call_sid.as_deref(), Some("CA1"));
        assert_eq!(hook.digits.as_deref(), Some("5"));
    }

    #[test]
    fn test_delivery_status_falls_back_to_sms_status() {
        let hook = TwilioWebhook {
            sms_status: Some("delivered".into()),
            ..Default::default()
        };
        assert_eq!(hook.delivery_status(), Some("delivered"));
    }
}
