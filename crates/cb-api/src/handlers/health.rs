//! Health endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::server::AppState;

/// Liveness probe
pub async fn liveness() -> &'static str {
    "OK"
}

pub async fn twilio(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "Twilio Integration Service",
        "configured": state.twilio.is_some(),
        "emailConfigured": state.email.is_some(),
    }))
}

pub async fn chatbot(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "chatbot",
        "timestamp": Utc::now().to_rfc3339(),
        "message": "Chatbot service is running",
        "strategy": state.chat.strategy(),
        "activeSessions": state.sessions.len(),
    }))
}

pub async fn vapi(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "Vapi AI Voice Service",
        "configured": state.vapi.is_some(),
    }))
}
