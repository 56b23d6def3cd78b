//! Chat-completion client for the model backend
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. Each call is
//! stateless: conversation context travels in the request, never in the
//! client. Rate limits and server errors are retried with exponential
//! backoff; repeated hard failures trip a process-wide circuit breaker shared
//! across all participants and judges.

use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

use moot_core::{ModelConfig, MootError, Result};

use crate::circuit_breaker::CircuitBreaker;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

const MAX_RETRIES: u32 = 4;
const INITIAL_BACKOFF_SECS: u64 = 2;
const MAX_BACKOFF_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: usize = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.7;

static BREAKER: OnceLock<CircuitBreaker> = OnceLock::new();

fn breaker() -> &'static CircuitBreaker {
    BREAKER.get_or_init(CircuitBreaker::default)
}

/// Client for one model backend
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

impl ChatClient {
    /// Build a client from model settings and a resolved API key.
    ///
    /// The caller resolves the key (typically from the environment variable
    /// named in the settings); the core never reads the environment.
    pub fn new(config: &ModelConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convenience wrapper: optional system prompt plus one user message
    pub async fn prompt(&self, system: Option<&str>, user: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(user));
        self.complete(&messages).await
    }

    /// Send a chat completion and return the first choice's text
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        if !breaker().allow() {
            return Err(MootError::ModelUnavailable(format!(
                "circuit breaker open; retry in {}s",
                breaker().retry_after_ms() / 1000
            )));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut retries = 0;
        let mut backoff_secs = INITIAL_BACKOFF_SECS;

        loop {
            debug!(
                "Requesting completion from {} (attempt {})",
                self.endpoint,
                retries + 1
            );
            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| MootError::ModelBackend(format!("request failed: {}", e)))?;

            let status = response.status();

            if status.as_u16() == 429 {
                retries += 1;
                if retries > MAX_RETRIES {
                    return Err(MootError::ModelBackend(format!(
                        "rate limited after {} retries",
                        MAX_RETRIES
                    )));
                }
                let wait_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(backoff_secs);
                warn!(
                    "Rate limited (429); waiting {}s before retry {}/{}",
                    wait_secs, retries, MAX_RETRIES
                );
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_else(|_| "unknown".to_string());

                if status.is_server_error() && retries < MAX_RETRIES {
                    retries += 1;
                    warn!(
                        "Server error ({}); waiting {}s before retry {}/{}",
                        status, backoff_secs, retries, MAX_RETRIES
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                breaker().on_failure();
                return Err(MootError::ModelBackend(format!(
                    "backend error {}: {}",
                    status, body
                )));
            }

            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| MootError::ModelBackend(format!("unparseable response: {}", e)))?;

            let content = parsed
                .choices
                .first()
                .and_then(|c| c.message.content.clone())
                .ok_or_else(|| {
                    MootError::ModelBackend("response contained no content".to_string())
                })?;

            breaker().on_success();
            if let Some(usage) = parsed.usage {
                debug!(
                    "Completion received ({} chars, {} prompt / {} completion tokens)",
                    content.len(),
                    usage.prompt_tokens,
                    usage.completion_tokens
                );
            }
            return Ok(content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let config = ModelConfig {
            model: "deepseek-chat".into(),
            base_url: "https://api.deepseek.com/".into(),
            api_key_env: "MOOT_API_KEY".into(),
        };
        let client = ChatClient::new(&config, "sk-test");
        assert_eq!(client.endpoint, "https://api.deepseek.com/chat/completions");
        assert_eq!(client.model(), "deepseek-chat");
    }

    #[test]
    fn test_builder_overrides() {
        let client = ChatClient::new(&ModelConfig::default(), "sk-test")
            .with_max_tokens(256)
            .with_temperature(0.1);
        assert_eq!(client.max_tokens, 256);
        assert!((client.temperature - 0.1).abs() < f32::EPSILON);
    }
}
