//! Chat endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use cb_chat::ChatReply;

use crate::error::{ApiError, Result};
use crate::extract::JsonBody;
use crate::server::AppState;

/// Chat request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
}

/// Answer one chat message with the configured strategy
pub async fn chat(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("Message is required".to_string()));
    }
    debug!("Chat request ({}): {}", state.chat.strategy(), message);

    let reply = state
        .chat
        .respond(message, req.session_id.as_deref(), req.user_id.as_deref())
        .await;
    Ok(Json(reply))
}

/// Conversation history of one session
pub async fn session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", id)))?;

    Ok(Json(json!({
        "success": true,
        "session": session,
    })))
}
