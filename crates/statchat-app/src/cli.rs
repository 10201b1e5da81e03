//! CLI argument definitions for the Statchat binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use statchat_core::types::{ConversationState, RequestType};
use std::path::PathBuf;

/// Statchat — conversational regression analysis over uploaded datasets.
#[derive(Parser, Debug)]
#[command(name = "statchat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Request type to run.
    #[arg(short = 't', long = "request-type", value_enum, default_value = "analysis")]
    pub request_type: RequestTypeArg,

    /// The user message for this turn.
    #[arg(short = 'm', long = "message")]
    pub message: String,

    /// Path to a JSON file holding the prior conversation turns.
    #[arg(long = "history")]
    pub history: Option<PathBuf>,

    /// Conversation state as last returned (init, catalog-presented,
    /// variables-resolved).
    #[arg(long = "state", value_enum, default_value = "init")]
    pub state: StateArg,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum RequestTypeArg {
    Analysis,
    Qna,
    Report,
}

impl From<RequestTypeArg> for RequestType {
    fn from(arg: RequestTypeArg) -> Self {
        match arg {
            RequestTypeArg::Analysis => RequestType::Analysis,
            RequestTypeArg::Qna => RequestType::Qna,
            RequestTypeArg::Report => RequestType::Report,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum StateArg {
    Init,
    CatalogPresented,
    VariablesResolved,
}

impl From<StateArg> for ConversationState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Init => ConversationState::Init,
            StateArg::CatalogPresented => ConversationState::CatalogPresented,
            StateArg::VariablesResolved => ConversationState::VariablesResolved,
        }
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > STATCHAT_CONFIG env var > platform default
    /// (~/.statchat/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("STATCHAT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".statchat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".statchat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
