//! Shared turn contract between the transport shell and the pipeline.
//!
//! A conversation turn arrives as a [`TurnRequest`] and leaves as a
//! [`TurnReply`]. The conversation history and state travel with the
//! request; persisting them between turns is the caller's concern.

use serde::{Deserialize, Serialize};

/// The kind of work a turn asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Run a regression analysis against an uploaded dataset.
    Analysis,
    /// Answer a question grounded in retrieved context.
    Qna,
    /// Produce a multi-section report grounded in retrieved context.
    Report,
}

/// Where an analysis conversation stands.
///
/// Replaces marker-phrase matching on serialized history: the caller stores
/// this alongside the conversation and sends it back with each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Nothing shown yet; the user has not seen the available columns.
    #[default]
    Init,
    /// The dataset catalog has been presented to the user.
    CatalogPresented,
    /// Variables were resolved and an analysis has run.
    VariablesResolved,
}

/// One prior message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// An incoming conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub request_type: RequestType,
    /// The new user message.
    pub message: String,
    /// Ordered prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<Turn>,
    /// Analysis-conversation state as last returned to the caller.
    #[serde(default)]
    pub state: ConversationState,
}

/// The reply payload for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    /// Natural-language reply shown to the user.
    pub reply: String,
    /// Raw analysis table, present only when a backend ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Conversation state for the caller to persist.
    pub state: ConversationState,
}

impl TurnReply {
    /// A reply carrying only a message, leaving the state unchanged.
    pub fn message(reply: impl Into<String>, state: ConversationState) -> Self {
        Self {
            reply: reply.into(),
            table: None,
            state,
        }
    }
}
