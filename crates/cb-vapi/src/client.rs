//! Vapi REST API client

use std::time::Duration;

use cb_core::dispatch::read_response;
use cb_core::{DispatchResult, ProviderError, VapiConfig};
use cb_twilio::address::{is_e164, is_resource_id};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{Result, VapiError};

const PROVIDER: &str = "Vapi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound AI call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VapiCallRequest {
    pub phone_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Vapi API client
#[derive(Debug, Clone)]
pub struct VapiClient {
    client: Client,
    private_key: String,
    base_url: String,
    phone_number_id: String,
    assistant_id: String,
    create_timeout: Duration,
    /// System message for assistants created by this client
    voice_persona: String,
}

impl VapiClient {
    pub fn new(config: &VapiConfig, voice_persona: impl Into<String>) -> Result<Self> {
        if !config.is_configured() {
            return Err(VapiError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VapiError::Config(e.to_string()))?;

        Ok(Self {
            client,
            private_key: config.private_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            phone_number_id: config.phone_number_id.clone(),
            assistant_id: config.assistant_id.clone(),
            create_timeout: Duration::from_secs(config.timeout_secs),
            voice_persona: voice_persona.into(),
        })
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Value> {
        let response = request
            .bearer_auth(&self.private_key)
            .send()
            .await
            .map_err(|e| ProviderError::transport(&e, context))?;
        Ok(read_response(PROVIDER, response, context).await?)
    }

    /// Assistant definition sent on creation
    pub fn assistant_definition(&self) -> Value {
        json!({
            "name": "Adlync Solutions Multilingual AI Assistant",
            "model": {
                "provider": "openai",
                "model": "gpt-4o-mini",
                "temperature": 0.7,
                "maxTokens": 150,
                "systemMessage": self.voice_persona,
            },
            "voice": {
                "provider": "11labs",
                "voiceId": "21m00Tcm4TlvDq8ikWAM",
                "stability": 0.7,
                "similarityBoost": 0.75,
                "speed": 0.85,
            },
            "transcriber": {
                "provider": "deepgram",
                "model": "nova-2",
                "language": "hi",
                "endpointing": 250,
            },
            "firstMessage": "Hello! Namaste! I'm from Adlync Solutions. How can I help you today?",
            "endCallMessage": "Thank you! Aapka din achha ho!",
            "recordingEnabled": true,
            "silenceTimeoutSeconds": 6,
            "maxDurationSeconds": 300,
            "backgroundSound": "office",
            "voicemailMessage": "Please call back kijiye jab time ho. Dhanyawad!",
        })
    }

    /// Create the voice assistant
    pub async fn create_assistant(&self) -> Result<DispatchResult> {
        info!("Creating Vapi assistant");
        let url = format!("{}/assistant", self.base_url);
        let request = self
            .client
            .post(&url)
            .timeout(self.create_timeout)
            .json(&self.assistant_definition());
        let data = self.send(request, "Failed to create assistant").await?;

        let result = DispatchResult::ok("Assistant created successfully", data);
        info!("Assistant created: {:?}", result.sid);
        Ok(result)
    }

    /// Place an AI voice call to a customer
    pub async fn initiate_call(&self, request: &VapiCallRequest) -> Result<DispatchResult> {
        let number = request.phone_number.trim();
        if !is_e164(number) {
            return Err(VapiError::Validation(
                "phoneNumber must be an E.164 phone number".to_string(),
            ));
        }
        if self.phone_number_id.is_empty() {
            return Err(VapiError::PhoneNumberNotConfigured);
        }

        let assistant_id = request
            .assistant_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .or(Some(self.assistant_id.as_str()).filter(|id| !id.is_empty()));

        let mut metadata = Map::new();
        metadata.insert("source".into(), json!("website"));
        metadata.insert("timestamp".into(), json!(chrono::Utc::now().to_rfc3339()));
        if let Some(extra) = &request.metadata {
            metadata.extend(extra.clone());
        }

        let payload = json!({
            "phoneNumberId": self.phone_number_id,
            "customer": {
                "number": number,
                "name": request.customer_name,
                "email": request.customer_email,
            },
            "assistantId": assistant_id,
            "metadata": metadata,
        });

        info!("Initiating Vapi call to {}", number);

        let url = format!("{}/call", self.base_url);
        let data = self
            .send(self.client.post(&url).json(&payload), "Failed to initiate Vapi call")
            .await?;

        Ok(DispatchResult::ok("AI voice call initiated successfully", data))
    }

    pub async fn call_status(&self, call_id: &str) -> Result<DispatchResult> {
        if !is_resource_id(call_id) {
            return Err(VapiError::Validation(
                "callId must contain only letters, digits, '_' or '-'".to_string(),
            ));
        }
        let url = format!("{}/call/{}", self.base_url, call_id);
        let context = format!("Failed to get call status for: {}", call_id);
        let data = self.send(self.client.get(&url), &context).await?;
        Ok(DispatchResult::ok("Call status retrieved successfully", data).with_sid(call_id))
    }

    pub async fn list_assistants(&self) -> Result<DispatchResult> {
        let url = format!("{}/assistant", self.base_url);
        let data = self
            .send(self.client.get(&url), "Failed to list assistants")
            .await?;
        Ok(DispatchResult::ok("Assistants retrieved successfully", data))
    }

    pub async fn list_phone_numbers(&self) -> Result<DispatchResult> {
        let url = format!("{}/phone-number", self.base_url);
        let data = self
            .send(self.client.get(&url), "Failed to list phone numbers")
            .await?;
        Ok(DispatchResult::ok("Phone numbers retrieved successfully", data))
    }

    /// Assistant used when a request names none
    pub fn default_assistant_id(&self) -> Option<&str> {
        Some(self.assistant_id.as_str()).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ProviderErrorKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> VapiClient {
        let config = VapiConfig {
            private_key: "vapi-private".into(),
            base_url: server.uri(),
            phone_number_id: "pn-1".into(),
            assistant_id: "asst-default".into(),
            ..Default::default()
        };
        VapiClient::new(&config, "You are a helpful voice assistant.").unwrap()
    }

    #[test]
    fn test_requires_private_key() {
        assert!(matches!(
            VapiClient::new(&VapiConfig::default(), ""),
            Err(VapiError::NotConfigured)
        ));
    }

    #[test]
    fn test_assistant_definition() {
        let server_less = VapiClient::new(
            &VapiConfig {
                private_key: "k".into(),
                ..Default::default()
            },
            "persona",
        )
        .unwrap();
        let def = server_less.assistant_definition();
        assert_eq!(def["model"]["model"], "gpt-4o-mini");
        assert_eq!(def["model"]["maxTokens"], 150);
        assert_eq!(def["model"]["systemMessage"], "persona");
        assert_eq!(def["voice"]["voiceId"], "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(def["transcriber"]["model"], "nova-2");
        assert_eq!(def["silenceTimeoutSeconds"], 6);
        assert_eq!(def["maxDurationSeconds"], 300);
    }

    #[tokio::test]
    async fn test_initiate_call_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call"))
            .and(header("authorization", "Bearer vapi-private"))
            .and(body_partial_json(json!({
                "phoneNumberId": "pn-1",
                "customer": {"number": "+919876543210", "name": "Priya"},
                "assistantId": "asst-default",
                "metadata": {"source": "landing-page", "campaign": "diwali"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "call-9", "status": "queued"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut metadata = Map::new();
        metadata.insert("source".into(), json!("landing-page"));
        metadata.insert("campaign".into(), json!("diwali"));

        let result = client_for(&server)
            .initiate_call(&VapiCallRequest {
                phone_number: "+919876543210".into(),
                customer_name: Some("Priya".into()),
                metadata: Some(metadata),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.sid.as_deref(), Some("call-9"));
        assert_eq!(result.message, "AI voice call initiated successfully");
    }

    #[tokio::test]
    async fn test_initiate_call_rejects_bad_number() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .initiate_call(&VapiCallRequest {
                phone_number: "9876543210".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, VapiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_initiate_call_needs_phone_number_id() {
        let server = MockServer::start().await;
        let client = VapiClient::new(
            &VapiConfig {
                private_key: "vapi-private".into(),
                base_url: server.uri(),
                ..Default::default()
            },
            "persona",
        )
        .unwrap();

        let err = client
            .initiate_call(&VapiCallRequest {
                phone_number: "+919876543210".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, VapiError::PhoneNumberNotConfigured));
    }

    #[tokio::test]
    async fn test_call_status_rejects_path_segments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).call_status("../assistant").await.unwrap_err();
        assert!(matches!(err, VapiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_errors_share_taxonomy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assistant"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid Key"})))
            .mount(&server)
            .await;

        match client_for(&server).list_assistants().await.unwrap_err() {
            VapiError::Provider(p) => {
                assert_eq!(p.kind, ProviderErrorKind::InvalidCredentials);
                assert_eq!(p.message, "Invalid Vapi credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/call/call-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "call-9", "status": "ended"})))
            .mount(&server)
            .await;

        let result = client_for(&server).call_status("call-9").await.unwrap();
        assert_eq!(result.data.unwrap()["status"], "ended");
    }
}
