//! Variable resolution: two sequential structured model calls with
//! short-circuits.
//!
//! Call one extracts candidate variable names from the conversation; call
//! two reconciles them against real catalog columns. Either call may end
//! the turn early with a user-facing message, and no model call happens at
//! all while the catalog is empty or not yet presented to the user.

use std::sync::Arc;

use statchat_catalog::DatasetCatalog;
use statchat_core::types::{ConversationState, Turn};
use statchat_llm::LanguageModel;
use tracing::debug;

use crate::error::ChatError;
use crate::prompts;
use crate::types::{IndependentSpec, ModelReply, ResolveOutcome, VariableSet};

const MISSING_INDEPENDENT: &str = "Please specify the name of the independent variable";
const MISSING_DEPENDENT: &str = "Please specify the name of the dependent variable";

/// Resolves conversational variable references to real catalog columns.
pub struct VariableResolver {
    gateway: Arc<dyn LanguageModel>,
}

impl VariableResolver {
    pub fn new(gateway: Arc<dyn LanguageModel>) -> Self {
        Self { gateway }
    }

    /// Run the resolution state machine for one turn.
    pub async fn resolve(
        &self,
        message: &str,
        history: &[Turn],
        catalog: &DatasetCatalog,
        state: ConversationState,
    ) -> Result<ResolveOutcome, ChatError> {
        // Both guards fire before any model call.
        if catalog.is_empty() {
            return Ok(ResolveOutcome::NoDatasets);
        }
        if state == ConversationState::Init {
            return Ok(ResolveOutcome::CatalogPresented(catalog.listing()));
        }

        let candidate = match self.extract(message, history).await? {
            Ok(candidate) => candidate,
            Err(outcome) => return Ok(outcome),
        };
        debug!(?candidate, "Extraction produced a candidate variable set");

        self.reconcile(&candidate, catalog).await
    }

    /// First structured call: candidate names from free text.
    async fn extract(
        &self,
        message: &str,
        history: &[Turn],
    ) -> Result<Result<VariableSet, ResolveOutcome>, ChatError> {
        let history_json = serde_json::to_string(history)?;
        let prompt = prompts::extraction_prompt(message, &history_json);
        let value = self.gateway.complete_structured(&prompt).await?;
        let reply: ModelReply = serde_json::from_value(value)
            .map_err(|e| ChatError::MalformedModelOutput(e.to_string()))?;

        if let Some(error) = reply.error {
            return Ok(Err(ResolveOutcome::Unresolved(error)));
        }
        let independent = match reply.independent_var.and_then(IndependentSpec::normalize) {
            Some(spec) => spec,
            None => {
                return Ok(Err(ResolveOutcome::Unresolved(
                    MISSING_INDEPENDENT.to_string(),
                )))
            }
        };
        let dependent = match reply.dependent_var {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Ok(Err(ResolveOutcome::Unresolved(
                    MISSING_DEPENDENT.to_string(),
                )))
            }
        };

        Ok(Ok(VariableSet {
            independent,
            dependent,
        }))
    }

    /// Second structured call: candidates against the real catalog.
    async fn reconcile(
        &self,
        candidate: &VariableSet,
        catalog: &DatasetCatalog,
    ) -> Result<ResolveOutcome, ChatError> {
        let candidate_json = serde_json::to_string(candidate)?;
        let prompt = prompts::reconciliation_prompt(&candidate_json, &catalog.to_json());
        let value = self.gateway.complete_structured(&prompt).await?;
        let reply: ModelReply = serde_json::from_value(value)
            .map_err(|e| ChatError::MalformedModelOutput(e.to_string()))?;

        // The model's no-confident-match error is surfaced unmodified.
        if let Some(error) = reply.error {
            return Ok(ResolveOutcome::Unresolved(error));
        }
        // A reconciliation reply that is neither an error nor complete
        // violates the reply contract.
        let independent = reply
            .independent_var
            .and_then(IndependentSpec::normalize)
            .ok_or_else(|| {
                ChatError::MalformedModelOutput(
                    "reconciliation reply missing independent_var".to_string(),
                )
            })?;
        let dependent = reply.dependent_var.ok_or_else(|| {
            ChatError::MalformedModelOutput(
                "reconciliation reply missing dependent_var".to_string(),
            )
        })?;

        let resolved = VariableSet {
            independent,
            dependent,
        };

        // Never hand out a name the catalog does not actually contain.
        for name in resolved.column_names() {
            if !catalog.contains_column(name) {
                return Ok(ResolveOutcome::Unresolved(format!(
                    "No matching column found for '{}' in the uploaded datasets",
                    name
                )));
            }
        }

        Ok(ResolveOutcome::Resolved(resolved))
    }
}

// =============================================================================
// Tests
// =============================================================================
