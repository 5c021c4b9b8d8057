//! Route definitions

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::handlers::{chat, health, twilio, vapi, webhooks};
use crate::middleware::auth::auth_middleware;
use crate::server::AppState;

/// Create the API router
pub fn routes(state: &AppState) -> Router<AppState> {
    // Dispatch and account endpoints, behind the API key
    let protected = Router::new()
        .route("/twilio/initiate-call", post(twilio::initiate_call))
        .route("/twilio/call-status/{sid}", get(twilio::call_status))
        .route("/twilio/send-sms", post(twilio::send_sms))
        .route("/twilio/sms-status/{sid}", get(twilio::sms_status))
        .route("/twilio/send-whatsapp", post(twilio::send_whatsapp))
        .route("/twilio/send-bulk-whatsapp", post(twilio::send_bulk_whatsapp))
        .route("/twilio/send-email", post(twilio::send_email))
        .route("/twilio/account-info", get(twilio::account_info))
        .route("/twilio/phone-numbers", get(twilio::phone_numbers))
        .route(
            "/twilio/available-numbers/{country}",
            get(twilio::available_numbers),
        )
        .route("/twilio/trial-info", get(twilio::trial_info))
        .route("/vapi/create-assistant", post(vapi::create_assistant))
        .route("/vapi/initiate-call", post(vapi::initiate_call))
        .route("/vapi/assistants", get(vapi::assistants))
        .route("/vapi/phone-numbers", get(vapi::phone_numbers))
        .route("/vapi/call-status/{id}", get(vapi::call_status))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let public = Router::new()
        .route("/twilio/health", get(health::twilio))
        .route("/chatbot/health", get(health::chatbot))
        .route("/vapi/health", get(health::vapi))
        .route("/chatbot/chat", post(chat::chat))
        .route("/chatbot/session/{id}", get(chat::session))
        .route("/vapi/assistant-chat", post(vapi::assistant_chat))
        .route("/vapi/webhook", post(vapi::webhook));

    // Twilio posts to these unprefixed paths
    let webhooks = Router::new()
        .route("/twilio/voice-response", post(webhooks::voice_response))
        .route("/twilio/gather-response", post(webhooks::gather_response))
        .route("/twilio/recording-complete", post(webhooks::recording_complete))
        .route("/twilio/call-status", post(webhooks::call_status))
        .route("/twilio/sms-status", post(webhooks::sms_status))
        .route("/twilio/whatsapp-status", post(webhooks::whatsapp_status))
        .route("/twilio/incoming-sms", post(webhooks::incoming_sms))
        .route("/twilio/incoming-whatsapp", post(webhooks::incoming_whatsapp));

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/api/v1", protected.merge(public))
        .merge(webhooks)
}
