//! cb-chat: chat responders for the web widget and messaging channels
//!
//! Two interchangeable strategies implement [`ChatResponder`]: a
//! deterministic keyword table and a completion-API responder that keeps
//! per-session history.

pub mod assistant;
pub mod completion;
pub mod fallback;
pub mod keyword;
pub mod suggestions;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use assistant::{AssistantBackend, AssistantChat, AssistantChatRequest, AssistantReply};
pub use completion::CompletionResponder;
pub use keyword::{match_keyword, KeywordResponder, KeywordRule, Pattern, KEYWORD_TABLE};

/// Answer to one chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "isFromKnowledgeBase")]
    pub from_knowledge_base: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub suggested_actions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            from_knowledge_base: false,
            confidence: None,
            suggested_actions: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// A chat answering strategy
#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Answer `text`. Never fails: errors degrade to a canned reply.
    async fn respond(
        &self,
        text: &str,
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) -> ChatReply;

    /// Strategy name, for health output and logs
    fn strategy(&self) -> &'static str;
}
