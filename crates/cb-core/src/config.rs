//! Configuration management
//!
//! Settings are resolved in this order (later wins):
//! 1. Built-in defaults
//! 2. `callbridge.toml` in the working directory (if present)
//! 3. Environment variables
//!
//! Inside the TOML file, `${VAR_NAME}` is expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Default config file looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "callbridge.toml";

/// Main configuration for callbridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Telephony/messaging provider
    pub twilio: TwilioConfig,
    /// Email provider
    pub sendgrid: SendGridConfig,
    /// Voice-AI provider
    pub vapi: VapiConfig,
    /// Text-completion API
    pub llm: LlmConfig,
    /// Chat responder settings
    pub chat: ChatConfig,
    /// IVR call-flow settings
    pub ivr: IvrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port for the HTTP server
    pub port: u16,
    /// Public base URL used to build provider callback URLs
    pub base_url: String,
    /// Environment label (development, production, ...)
    pub environment: String,
    /// Bearer key protecting dispatch routes. `None` leaves them open.
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            environment: "development".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    #[serde(skip_serializing)]
    pub auth_token: String,
    /// Default sender for calls and SMS
    pub phone_number: String,
    /// Default sender for WhatsApp
    pub whatsapp_number: String,
    pub base_url: String,
    /// Default delay between bulk sends, in seconds
    pub bulk_delay_secs: u64,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            phone_number: String::new(),
            whatsapp_number: String::new(),
            base_url: "https://api.twilio.com".to_string(),
            bulk_delay_secs: 2,
        }
    }
}

impl TwilioConfig {
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SendGridConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.sendgrid.com".to_string(),
        }
    }
}

impl SendGridConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VapiConfig {
    #[serde(skip_serializing)]
    pub private_key: String,
    pub public_key: String,
    pub base_url: String,
    /// Provider-side id of the number outbound AI calls are placed from
    pub phone_number_id: String,
    /// Assistant used when a call request does not name one
    pub assistant_id: String,
    /// Timeout for assistant creation, in seconds
    pub timeout_secs: u64,
}

impl Default for VapiConfig {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            public_key: String::new(),
            base_url: "https://api.vapi.ai".to_string(),
            phone_number_id: String::new(),
            assistant_id: String::new(),
            timeout_secs: 30,
        }
    }
}

impl VapiConfig {
    pub fn is_configured(&self) -> bool {
        !self.private_key.is_empty()
    }
}

/// Text-completion API configuration (OpenAI-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    /// Model used by the web chat responder
    pub chat_model: String,
    /// Model used by the voice-assistant chat
    pub assistant_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            assistant_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl LlmConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Which responder answers the HTTP chat endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatStrategy {
    /// Keyword table, no external calls
    Keyword,
    /// Completion API with session history
    #[default]
    Completion,
}

impl ChatStrategy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "keyword" | "keywords" | "canned" => Some(Self::Keyword),
            "completion" | "ai" | "llm" => Some(Self::Completion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub strategy: ChatStrategy,
    /// Directory with `chat_persona.md`, `knowledge_base.md`, `voice_persona.md`
    pub prompts_dir: String,
    /// Idle time after which a chat session is evicted
    pub session_timeout_secs: u64,
    /// Period of the session sweep
    pub sweep_interval_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            strategy: ChatStrategy::default(),
            prompts_dir: "assets/prompts".to_string(),
            session_timeout_secs: 30 * 60,
            sweep_interval_secs: 10 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IvrConfig {
    /// Live-transfer target for digit 0. Without it callers go to voicemail.
    pub transfer_number: Option<String>,
    /// Caller id presented on the transfer leg. Falls back to the Twilio number.
    pub caller_id: Option<String>,
    pub voice: String,
    pub language: String,
}

impl Default for IvrConfig {
    fn default() -> Self {
        Self {
            transfer_number: None,
            caller_id: None,
            voice: "alice".to_string(),
            language: "en-US".to_string(),
        }
    }
}

impl Config {
    /// Expand `${VAR_NAME}` references using `lookup`.
    ///
    /// Unknown variables expand to the empty string.
    fn expand_vars(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Some(v) = lookup(&var_name) {
                    result.push_str(&v);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from the default location.
    ///
    /// Uses `./callbridge.toml` when it exists, the environment otherwise.
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }
        Ok(Self::from_env())
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&content, env_lookup)?;
        cfg.apply_overrides(env_lookup);
        Ok(cfg)
    }

    /// Expand `${VAR}` in every string value of a parsed document.
    /// Keys and non-string values are left alone.
    fn expand_string_values(value: toml::Value, lookup: &impl Fn(&str) -> Option<String>) -> toml::Value {
        match value {
            toml::Value::String(s) => toml::Value::String(Self::expand_vars(&s, lookup)),
            toml::Value::Array(items) => toml::Value::Array(
                items
                    .into_iter()
                    .map(|v| Self::expand_string_values(v, lookup))
                    .collect(),
            ),
            toml::Value::Table(table) => toml::Value::Table(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::expand_string_values(v, lookup)))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Parse TOML content, expanding `${VAR}` through `lookup`.
    ///
    /// The document is parsed before expansion, so variable values are never
    /// read as TOML syntax.
    pub fn from_toml_str(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw: toml::Value = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        Self::expand_string_values(raw, &lookup)
            .try_into()
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))
    }

    /// Build configuration from defaults and environment variables only
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_overrides(env_lookup);
        cfg
    }

    /// Apply variable overrides. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Server
        if let Some(port) = get("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = get("APP_BASE_URL") {
            self.server.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(env) = get("APP_ENV").or_else(|| get("NODE_ENV")) {
            self.server.environment = env;
        }
        if let Some(key) = get("API_KEY") {
            self.server.api_key = Some(key);
        }

        // Twilio
        if let Some(v) = get("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = v;
        }
        if let Some(v) = get("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = v;
        }
        if let Some(v) = get("TWILIO_PHONE_NUMBER") {
            self.twilio.phone_number = v;
        }
        if let Some(v) = get("TWILIO_WHATSAPP_NUMBER") {
            self.twilio.whatsapp_number = v;
        }
        if let Some(v) = get("TWILIO_BASE_URL") {
            self.twilio.base_url = v;
        }
        if let Some(v) = get("BULK_DELAY_SECS").and_then(|v| v.parse().ok()) {
            self.twilio.bulk_delay_secs = v;
        }

        // SendGrid
        if let Some(v) = get("SENDGRID_API_KEY") {
            self.sendgrid.api_key = v;
        }
        if let Some(v) = get("SENDGRID_BASE_URL") {
            self.sendgrid.base_url = v;
        }

        // VAPI
        if let Some(v) = get("VAPI_PRIVATE_KEY") {
            self.vapi.private_key = v;
        }
        if let Some(v) = get("VAPI_PUBLIC_KEY") {
            self.vapi.public_key = v;
        }
        if let Some(v) = get("VAPI_BASE_URL") {
            self.vapi.base_url = v;
        }
        if let Some(v) = get("VAPI_PHONE_NUMBER_ID") {
            self.vapi.phone_number_id = v;
        }
        if let Some(v) = get("VAPI_ASSISTANT_ID") {
            self.vapi.assistant_id = v;
        }
        if let Some(v) = get("VAPI_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.vapi.timeout_secs = v;
        }

        // Completion API
        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = get("CHAT_MODEL") {
            self.llm.chat_model = v;
        }
        if let Some(v) = get("ASSISTANT_MODEL") {
            self.llm.assistant_model = v;
        }

        // Chat
        if let Some(s) = get("CHAT_STRATEGY").and_then(|v| ChatStrategy::parse(&v)) {
            self.chat.strategy = s;
        }
        if let Some(v) = get("PROMPTS_DIR") {
            self.chat.prompts_dir = v;
        }
        if let Some(v) = get("SESSION_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.chat.session_timeout_secs = v;
        }
        if let Some(v) = get("SESSION_SWEEP_SECS").and_then(|v| v.parse().ok()) {
            self.chat.sweep_interval_secs = v;
        }

        // IVR
        if let Some(v) = get("IVR_TRANSFER_NUMBER") {
            self.ivr.transfer_number = Some(v);
        }
        if let Some(v) = get("IVR_CALLER_ID") {
            self.ivr.caller_id = Some(v);
        }
        if let Some(v) = get("IVR_VOICE") {
            self.ivr.voice = v;
        }
        if let Some(v) = get("IVR_LANGUAGE") {
            self.ivr.language = v;
        }
    }

    /// Caller id for the IVR transfer leg
    pub fn ivr_caller_id(&self) -> Option<&str> {
        self.ivr
            .caller_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.twilio.phone_number.as_str()).filter(|s| !s.is_empty()))
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
