use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::DigestError;

/// Messages endpoint of the Anthropic API
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// API version sent in the `anthropic-version` header
pub const API_VERSION: &str = "2023-06-01";

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Upper bound on a single completion call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key; `None` or blank is reported as a config error at call time
    pub api_key: Option<String>,
    /// Model to use (e.g., "claude-3-haiku-20240307")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
    /// Bound on the whole request, connect through body
    pub timeout: Duration,
    /// Full URL of the messages endpoint
    pub endpoint: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            timeout: DEFAULT_TIMEOUT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl AnthropicConfig {
    /// Create config with the credential taken from ANTHROPIC_API_KEY, if set
    pub fn from_env() -> Self {
        Self::new(std::env::var("ANTHROPIC_API_KEY").ok())
    }

    /// Create with an explicit credential and default settings
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Body of a single-turn messages request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Build the request body for a prompt
    pub fn build_request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }

    /// Send one prompt and return the decoded provider payload.
    ///
    /// No retries are made. Transport failures other than a timeout come back
    /// as [`DigestError::Transport`] so the caller can let them propagate.
    pub async fn complete(&self, prompt: &str) -> Result<Value, DigestError> {
        let api_key = self.config.credential().ok_or(DigestError::Config)?;
        let request = self.build_request(prompt);

        debug!(
            "Sending {} prompt bytes to {} (model {}, timeout {:?})",
            prompt.len(),
            self.config.endpoint,
            self.config.model,
            self.config.timeout
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .timeout(self.config.timeout)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!("Anthropic API error: {}", status);
            return Err(DigestError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| DigestError::Unexpected {
            detail: format!("Provider returned a non-JSON body: {}", e),
            raw_response: Value::String(body),
        })
    }

    fn classify(&self, err: reqwest::Error) -> DigestError {
        if err.is_timeout() {
            warn!("Anthropic API call timed out after {:?}", self.config.timeout);
            DigestError::Timeout {
                secs: self.config.timeout.as_secs(),
            }
        } else {
            DigestError::Transport(err)
        }
    }
}
