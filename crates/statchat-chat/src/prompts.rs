//! Fixed prompt templates for the pipeline's model calls.
//!
//! Templates are plain string builders; every dynamic piece (message,
//! history, catalog) is serialized JSON appended to the instruction text.

use crate::types::VariableSet;

/// Preamble for report turns: instructs multi-section, policy-document
/// style output before the user's question.
pub const REPORT_PREAMBLE: &str = "Write the answer as a formal policy report with multiple \
    sections: an executive summary, background, analysis of the evidence, and concrete \
    recommendations. Use section headings and a professional register throughout.";

/// Extraction call: identify candidate variable names from the chat.
pub fn extraction_prompt(message: &str, history_json: &str) -> String {
    format!(
        "Seek the independent variable and the dependent variable in the user's request. \
         If either is missing, return a JSON object with a single key \"error\" describing \
         what is missing. If both are present, return a JSON object with the keys \
         \"independent_var\" and \"dependent_var\". The value of \"independent_var\" may be \
         a single name, or a list of names when several independent variables are implied. \
         Allow fuzzy spelling.\n\
         The chat history is:\n{history}\n\
         The new message is:\n{message}",
        history = history_json,
        message = message,
    )
}

/// Reconciliation call: match candidate names against real catalog columns.
pub fn reconciliation_prompt(candidate_json: &str, catalog_json: &str) -> String {
    format!(
        "Find the closest match between 1. the given independent_var and dependent_var and \
         2. the column names in the given dataset catalog. If no confident match exists for \
         either side, return a JSON object with a single key \"error\". If matches are found \
         for both, return a JSON object with the keys \"independent_var\" and \
         \"dependent_var\" whose values are the matching real column names; keep \
         \"independent_var\" a list if it was given as a list.\n\
         The given independent_var and dependent_var are:\n{candidate}\n\
         The dataset catalog (filename to column names) is:\n{catalog}",
        candidate = candidate_json,
        catalog = catalog_json,
    )
}

/// Explanation call: interpret the raw regression output.
pub fn explanation_prompt(analysis_result: &str, vars: &VariableSet) -> String {
    format!(
        "Please explain the results of this regression analysis, especially the relationship \
         between the dependent variable {dependent} and the independent variable(s) \
         {independent}, using R-squared, adjusted R-squared, coefficients, standard error, \
         and diagnostic tests. Focus on the coefficients. Relate your answer to past academic \
         papers by inferring from the column names. Be accurate and professional.\n\
         An example of the expected style: \"For every additional 9.3 m2 of living space \
         above the sample mean of 250.84 m2, an Auburn homeowner's electricity usage \
         increases an estimated 1.3 kWh/day (2.2%). On average, a one-year-old home uses \
         approximately 1.1 kWh/day (1.8%) less electricity, ceteris paribus, than an \
         otherwise identical home that is 10 years older.\"\n\
         The raw analysis output is:\n{result}",
        dependent = vars.dependent,
        independent = vars.independent.as_argument(),
        result = analysis_result,
    )
}
