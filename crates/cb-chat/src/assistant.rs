//! One-shot chat with the voice-assistant persona

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use cb_core::{CompletionClient, CompletionRequest, Config, Error, PromptAssets};

use crate::completion::REQUEST_TIMEOUT;

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

pub const ASSISTANT_FALLBACK: &str = "Main samajh nahi paayi, kya aap phir se bata sakte hain? I'm here to help with Adlync Solutions' services!";

const SUGGESTED_ACTIONS: [&str; 3] = [
    "Ask about AI services",
    "Inquire about pricing",
    "Request consultation",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantChatRequest {
    pub message: String,
    pub user_id: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub assistant_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub success: bool,
    pub response: String,
    pub message: String,
    pub session_id: String,
    #[serde(rename = "isFromKnowledgeBase")]
    pub from_knowledge_base: bool,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Source of assistant answers; a seam for tests and offline runs
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn answer(&self, persona: &str, message: &str) -> cb_core::Result<String>;
}

struct CompletionBackend {
    client: CompletionClient,
    model: String,
}

#[async_trait]
impl AssistantBackend for CompletionBackend {
    async fn answer(&self, persona: &str, message: &str) -> cb_core::Result<String> {
        let request = CompletionRequest::builder(&self.model)
            .system(persona)
            .user(message)
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
            .build();
        self.client.complete(&request).await
    }
}

pub struct AssistantChat {
    backend: Option<Box<dyn AssistantBackend>>,
    persona: String,
    default_assistant_id: Option<String>,
}

impl AssistantChat {
    pub fn new(
        client: Option<CompletionClient>,
        model: impl Into<String>,
        prompts: &PromptAssets,
        default_assistant_id: Option<String>,
    ) -> Self {
        let model = model.into();
        Self {
            backend: client.map(|client| {
                Box::new(CompletionBackend { client, model }) as Box<dyn AssistantBackend>
            }),
            persona: prompts.voice_persona.clone(),
            default_assistant_id,
        }
    }

    pub fn with_backend(
        backend: Box<dyn AssistantBackend>,
        prompts: &PromptAssets,
        default_assistant_id: Option<String>,
    ) -> Self {
        Self {
            backend: Some(backend),
            persona: prompts.voice_persona.clone(),
            default_assistant_id,
        }
    }

    pub fn from_config(config: &Config, prompts: &PromptAssets) -> cb_core::Result<Self> {
        let client = if config.llm.is_configured() {
            Some(CompletionClient::new(&config.llm, REQUEST_TIMEOUT)?)
        } else {
            info!("Completion API key not set, assistant chat will return the fallback");
            None
        };
        let assistant_id = Some(config.vapi.assistant_id.clone()).filter(|id| !id.is_empty());
        Ok(Self::new(
            client,
            config.llm.assistant_model.clone(),
            prompts,
            assistant_id,
        ))
    }

    pub async fn chat(&self, request: &AssistantChatRequest) -> AssistantReply {
        debug!(
            "Assistant chat from {} (source: {})",
            request.user_id,
            request.source.as_deref().unwrap_or("unknown")
        );

        let result = match &self.backend {
            Some(backend) => backend.answer(&self.persona, &request.message).await,
            None => Err(Error::Config("completion API not configured".to_string())),
        };

        match result {
            Ok(answer) => {
                let assistant_id = request
                    .assistant_id
                    .clone()
                    .or_else(|| self.default_assistant_id.clone());
                AssistantReply {
                    success: true,
                    response: answer.clone(),
                    message: answer,
                    session_id: request.user_id.clone(),
                    from_knowledge_base: true,
                    confidence: 0.9,
                    suggested_actions: SUGGESTED_ACTIONS.iter().map(|s| s.to_string()).collect(),
                    metadata: Some(json!({
                        "source": "vapi-assistant",
                        "assistantId": assistant_id,
                        "timestamp": Utc::now().to_rfc3339(),
                    })),
                    error: None,
                }
            }
            Err(e) => {
                error!("Assistant chat failed: {}", e);
                AssistantReply {
                    success: false,
                    response: ASSISTANT_FALLBACK.to_string(),
                    message: ASSISTANT_FALLBACK.to_string(),
                    session_id: request.user_id.clone(),
                    from_knowledge_base: false,
                    confidence: 0.5,
                    suggested_actions: Vec::new(),
                    metadata: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
