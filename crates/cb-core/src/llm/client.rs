//! Chat-completion HTTP client

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::*;

/// Client for an OpenAI-compatible completion API
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CompletionClient {
    /// Create a client with the given per-request timeout
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create with custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &LlmConfig, timeout: Duration, base_url: String) -> Result<Self> {
        let mut client = Self::new(config, timeout)?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Send a completion request and return the first choice's text
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            "Sending completion request: model={}, messages={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Completion API error: {}", status);
            return Err(Error::CompletionApi(format!("{}: {}", status, body)));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)?;

        let text = parsed
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::CompletionApi("Response contained no choices".to_string()))?
            .to_string();

        info!(
            "Completion response: model={}, tokens={}",
            request.model,
            parsed.usage.as_ref().map(|u| u.completion_tokens).unwrap_or(0)
        );

        Ok(text)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
