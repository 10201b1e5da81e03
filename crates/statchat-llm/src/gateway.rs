//! Language model gateway: trait seam plus the HTTP implementation.
//!
//! Three invocation modes:
//! - `complete`: free-form text completion.
//! - `complete_structured`: completion constrained to valid JSON; the
//!   parsed value is returned, and a parse failure is terminal for the
//!   request (no repair or retry).
//! - `complete_with_context`: free-form completion grounded in a retrieved
//!   context blob supplied alongside the query.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use statchat_core::config::LlmConfig;
use tracing::debug;

use crate::error::LlmError;

/// System message for structured mode. The endpoint's JSON response format
/// still requires the word "JSON" to appear in the conversation.
const STRUCTURED_SYSTEM_PROMPT: &str =
    "You are a precise assistant. Respond with a single valid JSON object and nothing else.";

// =============================================================================
// LanguageModel trait
// =============================================================================

/// Abstraction over the external natural-language model.
///
/// The pipeline only ever talks to this trait; tests substitute scripted
/// implementations.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-form text completion.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Strict-JSON structured completion.
    ///
    /// Output that is not valid JSON is a terminal error for this call.
    async fn complete_structured(&self, prompt: &str) -> Result<serde_json::Value, LlmError>;

    /// Free-form completion grounded in a retrieved context blob.
    async fn complete_with_context(&self, query: &str, context: &str)
        -> Result<String, LlmError>;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: ChatMessage,
}

impl CompletionResponse {
    /// Content of the first choice, if any.
    fn into_content(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::MissingContent)
    }
}

// =============================================================================
// HttpGateway
// =============================================================================

/// [`LanguageModel`] over an OpenAI-style chat-completions endpoint.
pub struct HttpGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl HttpGateway {
    /// Build a gateway from configuration.
    ///
    /// The API key is read once from the configured environment variable.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    async fn request(&self, messages: Vec<ChatMessage>, structured: bool) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            response_format: structured.then(ResponseFormat::json_object),
        };

        debug!(model = %self.model, structured, "Sending completion request");
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16()));
        }

        let parsed: CompletionResponse = response.json().await?;
        parsed.into_content()
    }
}

#[async_trait]
impl LanguageModel for HttpGateway {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];
        self.request(messages, false).await
    }

    async fn complete_structured(&self, prompt: &str) -> Result<serde_json::Value, LlmError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: STRUCTURED_SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ];
        let content = self.request(messages, true).await?;
        serde_json::from_str(&content).map_err(|e| LlmError::MalformedOutput(e.to_string()))
    }

    async fn complete_with_context(
        &self,
        query: &str,
        context: &str,
    ) -> Result<String, LlmError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: format!(
                    "Answer the user's question using the following context:\n{}",
                    context
                ),
            },
            ChatMessage {
                role: "user".to_string(),
                content: query.to_string(),
            },
        ];
        self.request(messages, false).await
    }
}

// =============================================================================
// Tests
// =============================================================================
