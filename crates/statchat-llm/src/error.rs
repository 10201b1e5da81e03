//! Error types for the language model gateway.

use statchat_core::error::StatChatError;
use thiserror::Error;

/// Errors from the language model gateway and retrieval clients.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
    #[error("response missing completion content")]
    MissingContent,
    #[error("api key environment variable not set: {0}")]
    MissingApiKey(String),
}

impl From<LlmError> for StatChatError {
    fn from(err: LlmError) -> Self {
        StatChatError::Llm(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_status() {
        let e = LlmError::Status(502);
        assert_eq!(e.to_string(), "service returned status 502");
    }

    #[test]
    fn test_error_display_malformed() {
        let e = LlmError::MalformedOutput("expected value at line 1".to_string());
        assert_eq!(
            e.to_string(),
            "malformed model output: expected value at line 1"
        );
    }

    #[test]
    fn test_error_display_missing_content() {
        assert_eq!(
            LlmError::MissingContent.to_string(),
            "response missing completion content"
        );
    }

    #[test]
    fn test_error_display_missing_api_key() {
        let e = LlmError::MissingApiKey("STATCHAT_API_KEY".to_string());
        assert!(e.to_string().contains("STATCHAT_API_KEY"));
    }

    #[test]
    fn test_conversion_to_core_error() {
        let e: StatChatError = LlmError::Status(500).into();
        assert!(matches!(e, StatChatError::Llm(_)));
        assert!(e.to_string().contains("500"));
    }
}
