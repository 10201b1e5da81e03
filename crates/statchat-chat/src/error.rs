//! Error types for the analysis pipeline.

use statchat_llm::LlmError;

/// Hard failures from the analysis pipeline.
///
/// User-recoverable conditions (empty catalog, unresolved variables) are
/// not errors; they travel as [`crate::types::ResolveOutcome`] variants.
/// Everything here is caught at the orchestrator boundary and converted
/// into a generic reply, never shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("LLM error: {0}")]
    Llm(String),
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),
    #[error("backend failure: {0}")]
    BackendFailure(String),
    #[error("backend timed out after {0} seconds")]
    BackendTimeout(u64),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<LlmError> for ChatError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MalformedOutput(msg) => ChatError::MalformedModelOutput(msg),
            other => ChatError::Llm(other.to_string()),
        }
    }
}
