//! Explanation synthesis for raw regression output.
//!
//! Presentation-only: the completion is returned unmodified and never
//! feeds back into control flow.

use std::sync::Arc;

use statchat_llm::LanguageModel;

use crate::error::ChatError;
use crate::prompts;
use crate::types::VariableSet;

/// Turns a raw analysis table into a professional interpretation.
pub struct ExplanationSynthesizer {
    gateway: Arc<dyn LanguageModel>,
}

impl ExplanationSynthesizer {
    pub fn new(gateway: Arc<dyn LanguageModel>) -> Self {
        Self { gateway }
    }

    /// Free-form completion over the fixed explanation template.
    pub async fn explain(
        &self,
        analysis_result: &str,
        vars: &VariableSet,
    ) -> Result<String, ChatError> {
        let prompt = prompts::explanation_prompt(analysis_result, vars);
        Ok(self.gateway.complete(&prompt).await?)
    }
}
