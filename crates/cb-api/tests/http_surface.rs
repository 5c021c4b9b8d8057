//! End-to-end tests of the router against mocked providers

use std::sync::Arc;

use axum::{body::Body, Router};
use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cb_api::{build_router, AppState};
use cb_core::{ChatStrategy, Config, PromptAssets, SessionStore, TwilioConfig};

const MESSAGES: &str = "/2010-04-01/Accounts/AC123/Messages.json";

fn base_config() -> Config {
    let mut config = Config::default();
    config.server.base_url = "https://app.example.com".to_string();
    config
}

fn with_twilio(mut config: Config, server: &MockServer) -> Config {
    config.twilio = TwilioConfig {
        account_sid: "AC123".into(),
        auth_token: "secret".into(),
        phone_number: "+14155550100".into(),
        whatsapp_number: "+14155550199".into(),
        base_url: server.uri(),
        bulk_delay_secs: 0,
    };
    config
}

fn app(config: Config) -> Router {
    let sessions = Arc::new(SessionStore::new(config.chat.session_timeout_secs));
    let state = AppState::from_config(config, &PromptAssets::bundled(), sessions).unwrap();
    build_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_liveness() {
    let app = app(base_config());
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_service_health_reports_configuration() {
    let app = app(base_config());
    let (status, body) = send(
        &app,
        Request::get("/api/v1/twilio/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["configured"], false);
}

#[tokio::test]
async fn test_empty_chat_message_is_rejected() {
    let app = app(base_config());
    let (status, body) = send(&app, post_json("/api/v1/chatbot/chat", json!({"message": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_keyword_chat() {
    let mut config = base_config();
    config.chat.strategy = ChatStrategy::Keyword;
    let app = app(config);

    let (status, body) = send(&app, post_json("/api/v1/chatbot/chat", json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json_body(&body)["message"]
        .as_str()
        .unwrap()
        .contains("1 - AI Videos"));
}

#[tokio::test]
async fn test_offline_completion_chat_keeps_session() {
    let app = app(base_config());

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/chatbot/chat",
            json!({"message": "What services do you offer?", "sessionId": "web-1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reply = json_body(&body);
    assert_eq!(reply["sessionId"], "web-1");
    assert_eq!(reply["isFromKnowledgeBase"], true);
    assert!(reply["suggestedActions"].as_array().unwrap().len() <= 3);

    let (status, body) = send(
        &app,
        Request::get("/api/v1/chatbot/session/web-1").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["session"]["turns"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        Request::get("/api/v1/chatbot/session/missing").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unconfigured_provider_is_503() {
    let app = app(base_config());
    let (status, body) = send(
        &app,
        post_json("/api/v1/twilio/send-sms", json!({"to": "+14155550001", "body": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(&body)["kind"], "not-configured");
}

#[tokio::test]
async fn test_api_key_guards_dispatch_routes() {
    let mut config = base_config();
    config.server.api_key = Some("letmein".to_string());
    let app = app(config);

    let (status, _) = send(&app, Request::get("/api/v1/twilio/account-info").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/api/v1/twilio/account-info")
        .header(header::AUTHORIZATION, "Bearer letmein")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Webhooks and chat stay open
    let (status, _) = send(&app, post_form("/twilio/call-status", "CallSid=CA1&CallStatus=completed")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_phone_number_is_400() {
    let server = MockServer::start().await;
    let app = app(with_twilio(base_config(), &server));

    let (status, body) = send(
        &app,
        post_json("/api/v1/twilio/send-whatsapp", json!({"to": "12345", "body": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["kind"], "validation");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_credentials_error_maps_to_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"code": 20003})))
        .mount(&server)
        .await;
    let app = app(with_twilio(base_config(), &server));

    let (status, body) = send(
        &app,
        post_json("/api/v1/twilio/send-sms", json!({"to": "+14155550001", "body": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert_eq!(body["message"], "Invalid Twilio credentials");
    assert_eq!(body["kind"], "invalid-credentials");
    assert_eq!(body["error"]["code"], 20003);
}

#[tokio::test]
async fn test_send_sms_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM42", "status": "queued"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(with_twilio(base_config(), &server));

    let (status, body) = send(
        &app,
        post_json("/api/v1/twilio/send-sms", json!({"to": "+14155550001", "body": "hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["success"], true);
    assert_eq!(body["sid"], "SM42");
    assert_eq!(body["message"], "SMS sent successfully");
}

#[tokio::test]
async fn test_gather_response_returns_twiml() {
    let app = app(base_config());
    let response = app
        .clone()
        .oneshot(post_form("/twilio/gather-response", "CallSid=CA1&Digits=9"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/xml");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("<Hangup/>"));
}

#[tokio::test]
async fn test_voice_response_plays_menu() {
    let app = app(base_config());
    let (status, body) = send(&app, post_form("/twilio/voice-response", "CallSid=CA1&From=%2B14155550001")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<Gather"));
}

#[tokio::test]
async fn test_status_callback_tolerates_bad_body() {
    let app = app(base_config());
    let request = Request::post("/twilio/sms-status")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_incoming_whatsapp_replies_from_keyword_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .and(body_string_contains("To=whatsapp%3A%2B14155550001"))
        .and(body_string_contains("Pricing"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SMreply"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(with_twilio(base_config(), &server));

    let (status, body) = send(
        &app,
        post_form(
            "/twilio/incoming-whatsapp",
            "From=whatsapp%3A%2B14155550001&To=whatsapp%3A%2B14155550199&Body=pricing",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<Response"));
}

#[tokio::test]
async fn test_incoming_sms_accepts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .and(body_string_contains("To=%2B14155550001"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SMreply"})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(with_twilio(base_config(), &server));

    let (status, _) = send(
        &app,
        post_json(
            "/twilio/incoming-sms",
            json!({"From": "+14155550001", "To": "+14155550100", "Body": "menu"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_incoming_message_without_twilio_still_acknowledged() {
    let app = app(base_config());
    let (status, _) = send(&app, post_form("/twilio/incoming-sms", "From=%2B14155550001&Body=hi")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_vapi_webhook_always_ok() {
    let app = app(base_config());
    let request = Request::post("/api/v1/vapi/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("garbage"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "OK");
}

#[tokio::test]
async fn test_assistant_chat_without_completion_api() {
    let app = app(base_config());
    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/vapi/assistant-chat",
            json!({"message": "Website chahiye", "userId": "u-1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["sessionId"], "u-1");
}
