//! Conversation orchestrator: sequences the pipeline per incoming turn.
//!
//! Analysis turns run scan -> resolve -> dispatch -> explain; qna and
//! report turns retrieve a context block and answer through the gateway's
//! context mode. Hard failures never cross the transport boundary: they
//! are logged in full and replaced with a generic reply.

use std::sync::Arc;

use statchat_catalog::DatasetIndex;
use statchat_core::config::StatChatConfig;
use statchat_core::types::{ConversationState, RequestType, TurnReply, TurnRequest};
use statchat_llm::{ContextRetriever, LanguageModel};
use tracing::{error, info, warn};

use crate::dispatcher::AnalysisDispatcher;
use crate::error::ChatError;
use crate::explain::ExplanationSynthesizer;
use crate::prompts::REPORT_PREAMBLE;
use crate::resolver::VariableResolver;
use crate::types::ResolveOutcome;

const UPLOAD_GUIDANCE: &str =
    "Please upload data files before requesting an analysis.";
const CATALOG_FOLLOW_UP: &str =
    "Tell me which variables to analyze, for example: regress Price on SqFt.";
const NO_COMMON_DATASET: &str =
    "The resolved variables do not appear together in any single dataset. \
     Please pick columns from one dataset.";
const GENERIC_FAILURE: &str =
    "Sorry, something went wrong while running your request. Please try again.";

/// Central coordinator wiring catalog, resolver, dispatcher, and synthesizer.
pub struct ChatOrchestrator {
    index: DatasetIndex,
    resolver: VariableResolver,
    dispatcher: AnalysisDispatcher,
    synthesizer: ExplanationSynthesizer,
    gateway: Arc<dyn LanguageModel>,
    search: Arc<dyn ContextRetriever>,
    report: Arc<dyn ContextRetriever>,
}

impl ChatOrchestrator {
    /// Build an orchestrator from configuration and service implementations.
    pub fn new(
        config: &StatChatConfig,
        gateway: Arc<dyn LanguageModel>,
        search: Arc<dyn ContextRetriever>,
        report: Arc<dyn ContextRetriever>,
    ) -> Self {
        Self {
            index: DatasetIndex::from_config(&config.storage),
            resolver: VariableResolver::new(Arc::clone(&gateway)),
            dispatcher: AnalysisDispatcher::from_config(&config.backends),
            synthesizer: ExplanationSynthesizer::new(Arc::clone(&gateway)),
            gateway,
            search,
            report,
        }
    }

    /// Handle one conversation turn.
    ///
    /// Never returns an error to the transport layer: hard failures are
    /// logged for operators and replaced with a generic reply.
    pub async fn handle_turn(&self, request: TurnRequest) -> TurnReply {
        match self.run_turn(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, request_type = ?request.request_type, "Turn failed");
                TurnReply::message(GENERIC_FAILURE, request.state)
            }
        }
    }

    async fn run_turn(&self, request: &TurnRequest) -> Result<TurnReply, ChatError> {
        match request.request_type {
            RequestType::Analysis => self.run_analysis(request).await,
            RequestType::Qna => self.run_grounded(request, &*self.search, None).await,
            RequestType::Report => {
                self.run_grounded(request, &*self.report, Some(REPORT_PREAMBLE))
                    .await
            }
        }
    }

    /// Full analysis pipeline: scan -> resolve -> dispatch -> explain.
    async fn run_analysis(&self, request: &TurnRequest) -> Result<TurnReply, ChatError> {
        let catalog = self.index.scan();

        let vars = match self
            .resolver
            .resolve(&request.message, &request.history, &catalog, request.state)
            .await?
        {
            ResolveOutcome::NoDatasets => {
                return Ok(TurnReply::message(UPLOAD_GUIDANCE, request.state));
            }
            ResolveOutcome::CatalogPresented(listing) => {
                return Ok(TurnReply::message(
                    format!("{}\n{}", listing, CATALOG_FOLLOW_UP),
                    ConversationState::CatalogPresented,
                ));
            }
            ResolveOutcome::Unresolved(message) => {
                return Ok(TurnReply::message(message, request.state));
            }
            ResolveOutcome::Resolved(vars) => vars,
        };

        let dataset_file = match catalog.locate(&vars.column_names()) {
            Some(file) => file.to_string(),
            None => return Ok(TurnReply::message(NO_COMMON_DATASET, request.state)),
        };
        let dataset_path = self.index.root().join(&dataset_file);

        info!(
            dataset = %dataset_file,
            independent = %vars.independent.as_argument(),
            dependent = %vars.dependent,
            "Running analysis"
        );
        let table = self.dispatcher.dispatch(&vars, &dataset_path).await?;
        let reply = self.synthesizer.explain(&table, &vars).await?;

        Ok(TurnReply {
            reply,
            table: Some(table),
            state: ConversationState::VariablesResolved,
        })
    }

    /// Context-grounded path for qna and report turns.
    ///
    /// Retrieval failure degrades to an empty context rather than failing
    /// the turn; the running history is always appended to the context.
    async fn run_grounded(
        &self,
        request: &TurnRequest,
        retriever: &dyn ContextRetriever,
        preamble: Option<&str>,
    ) -> Result<TurnReply, ChatError> {
        let mut context = match retriever.retrieve(&request.message).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!(error = %e, "Context retrieval failed; answering without context");
                Vec::new()
            }
        };
        context.push(serde_json::to_string(&request.history)?);
        let context_blob = serde_json::to_string(&context)?;

        let query = match preamble {
            Some(preamble) => format!("{}\n\n{}", preamble, request.message),
            None => request.message.clone(),
        };

        let reply = self.gateway.complete_with_context(&query, &context_blob).await?;
        Ok(TurnReply::message(reply, request.state))
    }
}

// =============================================================================
// Tests
// =============================================================================
