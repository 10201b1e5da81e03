//! Context retrieval clients for the external search and report services.
//!
//! Both services share one wire contract: POST `{question, temperature}`,
//! receive `{context: [string, ...]}`. One client instance is configured
//! per service URL.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use statchat_core::config::RetrievalConfig;
use tracing::debug;

use crate::error::LlmError;

/// Abstraction over a context retrieval service.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Fetch context chunks relevant to a question.
    async fn retrieve(&self, question: &str) -> Result<Vec<String>, LlmError>;
}

#[derive(Debug, Serialize)]
pub(crate) struct RetrievalRequest<'a> {
    pub question: &'a str,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RetrievalResponse {
    pub context: Vec<String>,
}

/// [`ContextRetriever`] over a simple HTTP POST endpoint.
pub struct HttpRetriever {
    client: reqwest::Client,
    url: String,
    temperature: f64,
}

impl HttpRetriever {
    pub fn new(url: impl Into<String>, temperature: f64, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            temperature,
        })
    }

    /// Client for the configured search service.
    pub fn search_from_config(config: &RetrievalConfig) -> Result<Self, LlmError> {
        Self::new(&config.search_url, config.temperature, config.timeout_secs)
    }

    /// Client for the configured report service.
    pub fn report_from_config(config: &RetrievalConfig) -> Result<Self, LlmError> {
        Self::new(&config.report_url, config.temperature, config.timeout_secs)
    }
}

#[async_trait]
impl ContextRetriever for HttpRetriever {
    async fn retrieve(&self, question: &str) -> Result<Vec<String>, LlmError> {
        debug!(url = %self.url, "Retrieving context");
        let response = self
            .client
            .post(&self.url)
            .json(&RetrievalRequest {
                question,
                temperature: self.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16()));
        }

        let parsed: RetrievalResponse = response.json().await?;
        Ok(parsed.context)
    }
}
