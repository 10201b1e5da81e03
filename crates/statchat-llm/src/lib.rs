//! Language Interpreter Gateway for Statchat.
//!
//! Abstracts the external language model behind the [`LanguageModel`]
//! trait with three invocation modes (free-form, strict-JSON structured,
//! and context-grounded), plus [`ContextRetriever`] clients for the
//! external search and report services.

pub mod error;
pub mod gateway;
pub mod retrieval;

pub use error::LlmError;
pub use gateway::{HttpGateway, LanguageModel};
pub use retrieval::{ContextRetriever, HttpRetriever};
