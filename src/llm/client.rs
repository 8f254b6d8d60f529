//! Core `LlmClient` trait and `ApiClient` implementation.
//!
//! `ApiClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! in JSON mode.  All connection details come from [`LlmConfig`]; nothing is
//! hardcoded.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("LLM endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP response envelope could not be parsed.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The response carried no choices at all.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Message content of a completion.
///
/// JSON mode should always yield an object, but the content is still decoded
/// defensively: undecodable text is kept as [`Completion::Raw`] so a batch
/// can log and skip it instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Json(Value),
    Raw(String),
}

impl Completion {
    /// Decode message content.  A missing message becomes an `error` object.
    pub fn from_content(content: Option<&str>) -> Self {
        match content {
            None => Completion::Json(serde_json::json!({ "error": "No response from model" })),
            Some(text) => match serde_json::from_str(text) {
                Ok(value) => Completion::Json(value),
                Err(_) => Completion::Raw(text.to_string()),
            },
        }
    }

    /// The `result` array of a JSON completion, if there is one.
    pub fn result_items(&self) -> Option<&[Value]> {
        match self {
            Completion::Json(value) => value.get("result")?.as_array().map(Vec::as_slice),
            Completion::Raw(_) => None,
        }
    }

    /// The `error` string of a JSON completion, if there is one.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Completion::Json(value) => value.get("error")?.as_str(),
            Completion::Raw(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmClient trait
// ---------------------------------------------------------------------------

/// Async trait for prompt completion.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn LlmClient>`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn send_prompt(&self, prompt: &str) -> Result<Completion, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            log::warn!("no LLM API key configured (set llm.api_key or OPENAI_API_KEY)");
        }

        Self {
            client,
            config: config.clone(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmClient for ApiClient {
    /// Send `prompt` as a single user message and decode the reply.
    ///
    /// The `Authorization: Bearer …` header is attached only when an API key
    /// is available, so keyless local providers work too.
    async fn send_prompt(&self, prompt: &str) -> Result<Completion, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "response_format": { "type": "json_object" }
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        log::debug!("LLM request: model={} prompt_len={}", self.config.model, prompt.len());
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        completion_from_envelope(&json)
    }
}

/// Pull the first choice's message content out of a chat-completions body.
fn completion_from_envelope(json: &Value) -> Result<Completion, LlmError> {
    let choice = json["choices"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or(LlmError::EmptyResponse)?;
    Ok(Completion::from_content(choice["message"]["content"].as_str()))
}

// ---------------------------------------------------------------------------
// MockLlm (tests only)
// ---------------------------------------------------------------------------

/// Scripted [`LlmClient`]: replays queued replies in order and records every
/// prompt it receives.  Once the queue is empty it answers `EmptyResponse`.
#[cfg(test)]
#[derive(Default)]
pub struct MockLlm {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<Completion, LlmError>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply.
    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(Completion::Json(value)));
        self
    }

    /// Queue a non-JSON reply.
    pub fn reply_raw(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Completion::Raw(text.to_string())));
        self
    }

    /// Queue a failure.
    pub fn fail(self, err: LlmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for MockLlm {
    async fn send_prompt(&self, prompt: &str) -> Result<Completion, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
