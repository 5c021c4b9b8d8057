//! HTTP API Server
//!
//! Shared state, router assembly, and the axum serve loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cb_chat::{AssistantChat, ChatResponder, CompletionResponder, KeywordResponder};
use cb_core::{ChatStrategy, Config, PromptAssets, SessionStore};
use cb_email::{EmailError, SendGridClient};
use cb_twilio::{IvrComposer, TwilioClient, TwilioError};
use cb_vapi::{VapiClient, VapiError};

use crate::error::ApiError;
use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub twilio: Option<Arc<TwilioClient>>,
    pub email: Option<Arc<SendGridClient>>,
    pub vapi: Option<Arc<VapiClient>>,
    /// Strategy behind the chat endpoint
    pub chat: Arc<dyn ChatResponder>,
    /// Strategy for inbound SMS and WhatsApp
    pub inbound: Arc<dyn ChatResponder>,
    pub assistant: Arc<AssistantChat>,
    pub sessions: Arc<SessionStore>,
    pub ivr: Arc<IvrComposer>,
}

impl AppState {
    /// Build every client from config. Providers without credentials are
    /// left out and their endpoints answer 503.
    pub fn from_config(
        config: Config,
        prompts: &PromptAssets,
        sessions: Arc<SessionStore>,
    ) -> anyhow::Result<Self> {
        let twilio = match TwilioClient::new(&config.twilio, &config.server.base_url) {
            Ok(client) => Some(Arc::new(client)),
            Err(TwilioError::NotConfigured) => {
                warn!("Twilio credentials not set, voice/SMS/WhatsApp endpoints disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let email = match SendGridClient::new(&config.sendgrid) {
            Ok(client) => Some(Arc::new(client)),
            Err(EmailError::NotConfigured) => {
                warn!("SendGrid API key not set, email endpoint disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let vapi = match VapiClient::new(&config.vapi, prompts.voice_persona.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(VapiError::NotConfigured) => {
                warn!("Vapi private key not set, voice-AI endpoints disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let chat: Arc<dyn ChatResponder> = match config.chat.strategy {
            ChatStrategy::Keyword => Arc::new(KeywordResponder::new()),
            ChatStrategy::Completion => Arc::new(CompletionResponder::from_config(
                &config,
                sessions.clone(),
                prompts,
            )?),
        };
        info!("Chat strategy: {}", chat.strategy());

        let assistant = Arc::new(AssistantChat::from_config(&config, prompts)?);
        let ivr = Arc::new(IvrComposer::from_config(&config));

        Ok(Self {
            config: Arc::new(config),
            twilio,
            email,
            vapi,
            chat,
            inbound: Arc::new(KeywordResponder::new()),
            assistant,
            sessions,
            ivr,
        })
    }

    pub fn twilio(&self) -> Result<&TwilioClient, ApiError> {
        self.twilio.as_deref().ok_or(ApiError::NotConfigured("Twilio"))
    }

    pub fn email(&self) -> Result<&SendGridClient, ApiError> {
        self.email.as_deref().ok_or(ApiError::NotConfigured("SendGrid"))
    }

    pub fn vapi(&self) -> Result<&VapiClient, ApiError> {
        self.vapi.as_deref().ok_or(ApiError::NotConfigured("Vapi"))
    }
}

/// Assemble the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP API server, stopping when `shutdown` resolves
pub async fn start_server(
    port: u16,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
