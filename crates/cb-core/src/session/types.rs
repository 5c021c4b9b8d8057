use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message in a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn to_message(&self) -> ChatMessage {
        match self.role {
            TurnRole::User => ChatMessage::user(&self.content),
            TurnRole::Assistant => ChatMessage::assistant(&self.content),
        }
    }
}

/// Conversation state for one chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub turns: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, user_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id,
            turns: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn push(&mut self, role: TurnRole, content: impl Into<String>, now: DateTime<Utc>) {
        self.turns.push(ChatTurn {
            role,
            content: content.into(),
            timestamp: now,
        });
        self.last_activity = now;
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn message_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_turns() {
        let now = Utc::now();
        let mut session = ChatSession::new("s1", None, now);
        for i in 0..8 {
            session.push(TurnRole::User, format!("msg {}", i), now);
        }
        let recent = session.recent(6);
        assert_eq!(recent.len(), 6);
        assert_eq!(recent[0].content, "msg 2");
        assert_eq!(recent[5].content, "msg 7");
        assert_eq!(session.recent(20).len(), 8);
    }

    #[test]
    fn test_turn_to_message() {
        let turn = ChatTurn {
            role: TurnRole::Assistant,
            content: "hi".into(),
            timestamp: Utc::now(),
        };
        assert_eq!(turn.to_message(), ChatMessage::assistant("hi"));
    }
}
