//! Twilio and SendGrid dispatch endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use cb_core::DispatchResult;
use cb_email::EmailRequest;
use cb_twilio::{BulkWhatsAppRequest, CallRequest, SmsRequest, WhatsAppRequest};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::server::AppState;

pub async fn initiate_call(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CallRequest>,
) -> Result<Json<DispatchResult>> {
    info!("Initiating call to {}", req.to);
    Ok(Json(state.twilio()?.initiate_call(&req).await?))
}

pub async fn call_status(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<DispatchResult>> {
    Ok(Json(state.twilio()?.call_status(&sid).await?))
}

pub async fn send_sms(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SmsRequest>,
) -> Result<Json<DispatchResult>> {
    info!("Sending SMS to {}", req.to);
    Ok(Json(state.twilio()?.send_sms(&req).await?))
}

pub async fn sms_status(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<DispatchResult>> {
    Ok(Json(state.twilio()?.message_status(&sid).await?))
}

pub async fn send_whatsapp(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<WhatsAppRequest>,
) -> Result<Json<DispatchResult>> {
    info!("Sending WhatsApp message to {}", req.to);
    Ok(Json(state.twilio()?.send_whatsapp(&req).await?))
}

/// Sequential bulk send. The response arrives after the last recipient.
pub async fn send_bulk_whatsapp(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BulkWhatsAppRequest>,
) -> Result<Json<DispatchResult>> {
    info!("Bulk WhatsApp to {} recipients", req.phone_numbers.len());
    Ok(Json(state.twilio()?.send_bulk_whatsapp(&req).await?))
}

pub async fn send_email(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EmailRequest>,
) -> Result<Json<DispatchResult>> {
    info!("Sending email to {}", req.to);
    Ok(Json(state.email()?.send(&req).await?))
}

pub async fn account_info(State(state): State<AppState>) -> Result<Json<DispatchResult>> {
    Ok(Json(state.twilio()?.account_info().await?))
}

pub async fn phone_numbers(State(state): State<AppState>) -> Result<Json<DispatchResult>> {
    Ok(Json(state.twilio()?.phone_numbers().await?))
}

pub async fn available_numbers(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<DispatchResult>> {
    Ok(Json(state.twilio()?.available_numbers(&country).await?))
}

pub async fn trial_info(State(state): State<AppState>) -> Result<Json<DispatchResult>> {
    Ok(Json(state.twilio()?.trial_info().await?))
}
