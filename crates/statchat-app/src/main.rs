//! Statchat application binary - composition root.
//!
//! Ties the workspace crates together for a single conversation turn:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. Wire the HTTP language model gateway and retrieval clients into the
//!    conversation orchestrator
//! 4. Run the requested turn and print the reply payload as JSON
//!
//! The chat transport, persistence, and UI shells are external
//! collaborators; they call into `statchat-chat` the same way this binary
//! does.

mod cli;

use std::sync::Arc;

use clap::Parser;

use statchat_chat::ChatOrchestrator;
use statchat_core::config::StatChatConfig;
use statchat_core::types::{Turn, TurnRequest};
use statchat_llm::{HttpGateway, HttpRetriever};

use crate::cli::CliArgs;

/// Load prior turns from a JSON history file, if one was given.
fn load_history(path: Option<&std::path::Path>) -> Result<Vec<Turn>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(Vec::new()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = StatChatConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Statchat v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Services.
    let gateway = Arc::new(HttpGateway::from_config(&config.llm)?);
    let search = Arc::new(HttpRetriever::search_from_config(&config.retrieval)?);
    let report = Arc::new(HttpRetriever::report_from_config(&config.retrieval)?);

    let orchestrator = ChatOrchestrator::new(&config, gateway, search, report);

    // One turn.
    let history = load_history(args.history.as_deref())?;
    let request = TurnRequest {
        request_type: args.request_type.into(),
        message: args.message.clone(),
        history,
        state: args.state.into(),
    };

    let reply = orchestrator.handle_turn(request).await;
    println!("{}", serde_json::to_string_pretty(&reply)?);

    Ok(())
}
