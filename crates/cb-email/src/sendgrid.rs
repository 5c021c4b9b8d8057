//! SendGrid v3 mail-send client

use std::sync::LazyLock;
use std::time::Duration;

use cb_core::dispatch::read_response;
use cb_core::{DispatchResult, ProviderError, SendGridConfig};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{EmailError, Result};

const PROVIDER: &str = "SendGrid";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

/// `local@domain.tld` with no whitespace
pub fn is_email(address: &str) -> bool {
    EMAIL.is_match(address)
}

/// File attached to an email. `content` is base64.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Outbound email
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

impl EmailRequest {
    fn validate(&self) -> Result<()> {
        for (field, value) in [("to", &self.to), ("from", &self.from)] {
            if !is_email(value.trim()) {
                return Err(EmailError::Validation(format!(
                    "{} must be a valid email address",
                    field
                )));
            }
        }
        for (field, value) in [("subject", &self.subject), ("text", &self.text)] {
            if value.trim().is_empty() {
                return Err(EmailError::Validation(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }

    /// SendGrid mail-send body
    fn to_payload(&self) -> Value {
        let mut content = vec![json!({"type": "text/plain", "value": self.text})];
        if let Some(html) = &self.html {
            content.push(json!({"type": "text/html", "value": html}));
        }

        let mut payload = json!({
            "personalizations": [{
                "to": [{"email": self.to.trim()}],
                "subject": self.subject,
            }],
            "from": {"email": self.from.trim()},
            "content": content,
        });
        if let Some(attachments) = &self.attachments {
            payload["attachments"] = json!(attachments);
        }
        payload
    }
}

/// SendGrid API client
#[derive(Debug, Clone)]
pub struct SendGridClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SendGridClient {
    pub fn new(config: &SendGridConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(EmailError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmailError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send an email. SendGrid answers `202 Accepted` with an empty body.
    pub async fn send(&self, request: &EmailRequest) -> Result<DispatchResult> {
        request.validate()?;

        info!("Sending email from {} to {}", request.from, request.to);

        let context = "Failed to send email";
        let url = format!("{}/v3/mail/send", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request.to_payload())
            .send()
            .await
            .map_err(|e| ProviderError::transport(&e, context))?;

        let status = response.status().as_u16();
        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        read_response(PROVIDER, response, context).await?;

        info!("Email accepted by SendGrid");
        Ok(DispatchResult {
            success: true,
            sid: message_id,
            message: "Email sent successfully".to_string(),
            data: Some(json!({"status": status})),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ProviderErrorKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> EmailRequest {
        EmailRequest {
            to: "jane@example.com".into(),
            from: "hello@adlync.example".into(),
            subject: "Your consultation".into(),
            text: "See you soon".into(),
            ..Default::default()
        }
    }

    fn client_for(server: &MockServer) -> SendGridClient {
        SendGridClient::new(&SendGridConfig {
            api_key: "SG.key".into(),
            base_url: server.uri(),
        })
        .unwrap()
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("a@b.co"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("@c.com"));
        assert!(!is_email("plain"));
    }

    #[test]
    fn test_payload_shape() {
        let mut req = request();
        req.html = Some("<p>See you soon</p>".into());
        req.attachments = Some(vec![Attachment {
            filename: "brief.pdf".into(),
            content: "JVBERi0=".into(),
            mime_type: "application/pdf".into(),
        }]);

        let payload = req.to_payload();
        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "jane@example.com");
        assert_eq!(payload["personalizations"][0]["subject"], "Your consultation");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][1]["type"], "text/html");
        assert_eq!(payload["attachments"][0]["type"], "application/pdf");
    }

    #[test]
    fn test_payload_omits_optional_parts() {
        let payload = request().to_payload();
        assert_eq!(payload["content"].as_array().unwrap().len(), 1);
        assert!(payload.get("attachments").is_none());
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            SendGridClient::new(&SendGridConfig::default()),
            Err(EmailError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_send_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer SG.key"))
            .and(body_partial_json(json!({"from": {"email": "hello@adlync.example"}})))
            .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "msg-42"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).send(&request()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.sid.as_deref(), Some("msg-42"));
        assert_eq!(result.data.unwrap()["status"], 202);
    }

    #[tokio::test]
    async fn test_send_rejects_bad_address() {
        let server = MockServer::start().await;
        let mut req = request();
        req.to = "not-an-email".into();
        let err = client_for(&server).send(&req).await.unwrap_err();
        assert!(matches!(err, EmailError::Validation(_)));
    }

    #[tokio::test]
    async fn test_send_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"errors": [{"message": "access forbidden"}]})),
            )
            .mount(&server)
            .await;

        match client_for(&server).send(&request()).await.unwrap_err() {
            EmailError::Provider(p) => {
                assert_eq!(p.kind, ProviderErrorKind::InsufficientPermissions);
                assert_eq!(p.details.unwrap()["errors"][0]["message"], "access forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
