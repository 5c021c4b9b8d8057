//! Twilio webhook receivers
//!
//! IVR steps answer with TwiML. Status callbacks and inbound messages are
//! always acknowledged with 200 so Twilio does not retry them.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, error, info, warn};

use cb_core::Channel;
use cb_twilio::{SmsRequest, TwilioWebhook, TwimlBuilder, WhatsAppRequest, TWIML_CONTENT_TYPE};

use crate::error::ApiError;
use crate::extract::FormOrJson;
use crate::server::AppState;

type Webhook = std::result::Result<FormOrJson<TwilioWebhook>, ApiError>;

fn twiml(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)], body)
}

/// Unreadable bodies are logged and treated as empty
fn webhook_fields(webhook: Webhook, endpoint: &str) -> TwilioWebhook {
    match webhook {
        Ok(FormOrJson(fields)) => fields,
        Err(e) => {
            warn!("Unreadable {} webhook: {}", endpoint, e);
            TwilioWebhook::default()
        }
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Call connected: play the main menu
pub async fn voice_response(State(state): State<AppState>, webhook: Webhook) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "voice-response");
    info!(
        "Incoming call {} from {}",
        or_dash(&fields.call_sid),
        or_dash(&fields.from)
    );
    twiml(state.ivr.greeting())
}

/// Caller pressed a key
pub async fn gather_response(State(state): State<AppState>, webhook: Webhook) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "gather-response");
    let response = state.ivr.respond(fields.digits.as_deref());
    info!(
        "Call {} pressed {:?}: {:?} -> {:?}",
        or_dash(&fields.call_sid),
        fields.digits,
        response.action,
        response.outcome
    );
    twiml(response.twiml)
}

/// Voicemail recorded
pub async fn recording_complete(
    State(state): State<AppState>,
    webhook: Webhook,
) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "recording-complete");
    info!(
        "Recording {} for call {} ({}s): {}",
        or_dash(&fields.recording_sid),
        or_dash(&fields.call_sid),
        or_dash(&fields.recording_duration),
        or_dash(&fields.recording_url)
    );
    twiml(state.ivr.recording_complete())
}

pub async fn call_status(webhook: Webhook) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "call-status");
    info!(
        "Call {} status: {} (duration {}s)",
        or_dash(&fields.call_sid),
        or_dash(&fields.call_status),
        or_dash(&fields.call_duration)
    );
    (StatusCode::OK, "OK")
}

pub async fn sms_status(webhook: Webhook) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "sms-status");
    info!(
        "SMS {} status: {}",
        or_dash(&fields.message_sid),
        fields.delivery_status().unwrap_or("-")
    );
    (StatusCode::OK, "OK")
}

pub async fn whatsapp_status(webhook: Webhook) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "whatsapp-status");
    info!(
        "WhatsApp {} status: {}",
        or_dash(&fields.message_sid),
        fields.delivery_status().unwrap_or("-")
    );
    if let Some(code) = &fields.error_code {
        warn!("WhatsApp {} error code {}", or_dash(&fields.message_sid), code);
    }
    (StatusCode::OK, "OK")
}

/// Inbound SMS: answer from the keyword table by SMS
pub async fn incoming_sms(State(state): State<AppState>, webhook: Webhook) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "incoming-sms");
    answer_inbound(&state, Channel::Sms, &fields).await;
    twiml(TwimlBuilder::empty())
}

/// Inbound WhatsApp: answer from the keyword table on WhatsApp
pub async fn incoming_whatsapp(
    State(state): State<AppState>,
    webhook: Webhook,
) -> impl IntoResponse {
    let fields = webhook_fields(webhook, "incoming-whatsapp");
    answer_inbound(&state, Channel::WhatsApp, &fields).await;
    twiml(TwimlBuilder::empty())
}

/// Reply to an inbound message on the channel it arrived on, from the
/// number it was sent to. Failures are logged only.
async fn answer_inbound(state: &AppState, channel: Channel, fields: &TwilioWebhook) {
    let Some((from, body)) = sender_and_body(fields) else {
        return;
    };
    info!("Inbound {} from {}: {}", channel, from, body);

    let reply = state.inbound.respond(body, None, None).await;
    let client = match state.twilio() {
        Ok(client) => client,
        Err(e) => {
            warn!("Cannot reply to {}: {}", from, e);
            return;
        }
    };

    let to = from.to_string();
    let sender = fields.to.clone().unwrap_or_default();
    let result = match channel {
        Channel::WhatsApp => {
            client
                .send_whatsapp(&WhatsAppRequest {
                    to,
                    from: sender,
                    body: reply.message,
                    ..Default::default()
                })
                .await
        }
        _ => {
            client
                .send_sms(&SmsRequest {
                    to,
                    from: sender,
                    body: reply.message,
                    ..Default::default()
                })
                .await
        }
    };

    match result {
        Ok(sent) => debug!("{} reply to {} sent: {:?}", channel, from, sent.sid),
        Err(e) => error!("Failed to send {} reply to {}: {}", channel, from, e),
    }
}

/// Sender and trimmed text of an inbound message. `None` without a sender.
fn sender_and_body(fields: &TwilioWebhook) -> Option<(&str, &str)> {
    let from = fields.from.as_deref().map(str::trim).filter(|f| !f.is_empty());
    let Some(from) = from else {
        debug!("Inbound message without a sender, ignoring");
        return None;
    };
    Some((from, fields.body.as_deref().unwrap_or("").trim()))
}
