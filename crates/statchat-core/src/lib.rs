//! Core types and cross-cutting concerns for Statchat.
//!
//! Holds the configuration model, the top-level error type, and the shared
//! turn contract (request type, conversation state, reply payload) used by
//! every other crate in the workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::StatChatConfig;
pub use error::{Result, StatChatError};
pub use types::{ConversationState, RequestType, Turn, TurnReply, TurnRequest};
