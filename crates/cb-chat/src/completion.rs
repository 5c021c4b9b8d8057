//! Completion-API chat strategy with per-session history

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use cb_core::{
    CompletionClient, CompletionRequest, Config, PromptAssets, SessionStore, TurnRole,
};

use crate::fallback::offline_answer;
use crate::suggestions::suggested_actions;
use crate::{ChatReply, ChatResponder};

/// Turns of history sent with each request, current user turn included
pub const HISTORY_TURNS: usize = 6;
pub const MAX_TOKENS: u32 = 100;
pub const TEMPERATURE: f32 = 0.7;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const APOLOGY: &str = "I apologize, but I encountered an error. Please try again or contact our Adlync Solutions team directly for assistance!";

pub struct CompletionResponder {
    sessions: Arc<SessionStore>,
    client: Option<CompletionClient>,
    system_prompt: String,
    model: String,
}

impl CompletionResponder {
    pub fn new(
        sessions: Arc<SessionStore>,
        client: Option<CompletionClient>,
        prompts: &PromptAssets,
        model: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            client,
            system_prompt: prompts.chat_system.clone(),
            model: model.into(),
        }
    }

    /// Build from config. Without an API key the responder answers offline.
    pub fn from_config(
        config: &Config,
        sessions: Arc<SessionStore>,
        prompts: &PromptAssets,
    ) -> cb_core::Result<Self> {
        let client = if config.llm.is_configured() {
            Some(CompletionClient::new(&config.llm, REQUEST_TIMEOUT)?)
        } else {
            info!("Completion API key not set, chat will use offline answers");
            None
        };
        Ok(Self::new(sessions, client, prompts, config.llm.chat_model.clone()))
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    fn offline_reply(&self, session_id: &str, text: &str) -> ChatReply {
        let answer = offline_answer(text);
        self.sessions
            .append(session_id, TurnRole::Assistant, answer.message);

        ChatReply {
            message: answer.message.to_string(),
            session_id: Some(session_id.to_string()),
            from_knowledge_base: answer.from_knowledge_base,
            confidence: Some(answer.confidence),
            suggested_actions: suggested_actions(text, answer.from_knowledge_base),
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl ChatResponder for CompletionResponder {
    async fn respond(
        &self,
        text: &str,
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) -> ChatReply {
        let session_id = self.sessions.open(session_id, user_id);
        self.sessions.append(&session_id, TurnRole::User, text);

        let Some(client) = &self.client else {
            return self.offline_reply(&session_id, text);
        };

        let history = self.sessions.recent_turns(&session_id, HISTORY_TURNS);
        let request = CompletionRequest::builder(&self.model)
            .system(&self.system_prompt)
            .messages(history.iter().map(|turn| turn.to_message()))
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
            .build();

        debug!(
            "Chat completion for session {} with {} turns",
            session_id,
            history.len()
        );

        match client.complete(&request).await {
            Ok(answer) => {
                self.sessions
                    .append(&session_id, TurnRole::Assistant, &answer);
                ChatReply {
                    message: answer,
                    session_id: Some(session_id),
                    from_knowledge_base: true,
                    confidence: Some(0.9),
                    suggested_actions: suggested_actions(text, true),
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                warn!("Chat completion failed for session {}: {}", session_id, e);
                ChatReply {
                    session_id: Some(session_id),
                    ..ChatReply::new(APOLOGY)
                }
            }
        }
    }

    fn strategy(&self) -> &'static str {
        "completion"
    }
}
