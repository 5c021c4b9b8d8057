//! Voice-AI endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use cb_chat::{AssistantChatRequest, AssistantReply};
use cb_core::DispatchResult;
use cb_vapi::{VapiCallRequest, VapiEvent};

use crate::error::{ApiError, Result};
use crate::extract::JsonBody;
use crate::server::AppState;

pub async fn create_assistant(State(state): State<AppState>) -> Result<Json<DispatchResult>> {
    info!("Creating Vapi assistant");
    Ok(Json(state.vapi()?.create_assistant().await?))
}

pub async fn initiate_call(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VapiCallRequest>,
) -> Result<Json<DispatchResult>> {
    info!("Initiating AI voice call to {}", req.phone_number);
    Ok(Json(state.vapi()?.initiate_call(&req).await?))
}

pub async fn call_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DispatchResult>> {
    Ok(Json(state.vapi()?.call_status(&id).await?))
}

pub async fn assistants(State(state): State<AppState>) -> Result<Json<DispatchResult>> {
    Ok(Json(state.vapi()?.list_assistants().await?))
}

pub async fn phone_numbers(State(state): State<AppState>) -> Result<Json<DispatchResult>> {
    Ok(Json(state.vapi()?.list_phone_numbers().await?))
}

/// One-shot chat with the voice-assistant persona
pub async fn assistant_chat(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AssistantChatRequest>,
) -> Result<Json<AssistantReply>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation("Message is required".to_string()));
    }
    info!("Assistant chat from user {}", req.user_id);
    Ok(Json(state.assistant.chat(&req).await))
}

/// Event webhook. Always acknowledged, even when the body is unreadable.
pub async fn webhook(body: Bytes) -> Json<Value> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let event = VapiEvent::parse(&body);

    match &event {
        VapiEvent::CallStarted { call_id } => {
            info!("Vapi call started: {}", call_id.as_deref().unwrap_or("-"));
        }
        VapiEvent::CallEnded {
            call_id,
            duration_secs,
        } => {
            info!(
                "Vapi call ended: {} ({:?}s)",
                call_id.as_deref().unwrap_or("-"),
                duration_secs
            );
        }
        VapiEvent::Transcript { text } => {
            debug!("Vapi transcript: {}", text.as_deref().unwrap_or(""));
        }
        VapiEvent::FunctionCall { name } => {
            info!("Vapi function called: {}", name.as_deref().unwrap_or("-"));
        }
        VapiEvent::Other { event_type } => {
            debug!("Unhandled Vapi event: {:?}", event_type);
        }
    }

    Json(json!({ "status": "OK" }))
}
