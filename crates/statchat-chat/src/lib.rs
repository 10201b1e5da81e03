//! Conversational regression-analysis pipeline for Statchat.
//!
//! Turns a chat message into a validated statistical job and its result
//! back into prose: variable extraction and reconciliation against the
//! dataset catalog, single- vs. multi-variable backend dispatch, and
//! result interpretation, sequenced per turn by the orchestrator.

pub mod dispatcher;
pub mod error;
pub mod explain;
pub mod orchestrator;
pub mod prompts;
pub mod resolver;
pub mod types;

pub use dispatcher::{backend_for, AnalysisDispatcher, Backend};
pub use error::ChatError;
pub use explain::ExplanationSynthesizer;
pub use orchestrator::ChatOrchestrator;
pub use resolver::VariableResolver;
pub use types::{IndependentSpec, ResolveOutcome, VariableSet};
