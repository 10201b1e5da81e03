//! Domain types for variable resolution and dispatch.

use serde::{Deserialize, Serialize};

// =============================================================================
// IndependentSpec
// =============================================================================

/// The independent side of a regression: one predictor or several.
///
/// This is the canonical shape for both extraction and reconciliation
/// output. The model may answer with a JSON string or an array in either
/// call; both deserialize here, and [`IndependentSpec::normalize`] is
/// applied at every stage boundary so downstream code never sees a
/// one-element or empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndependentSpec {
    Single(String),
    Many(Vec<String>),
}

impl IndependentSpec {
    /// Collapse degenerate lists: one name becomes `Single`, an empty list
    /// becomes `None` (treated as a missing variable).
    pub fn normalize(self) -> Option<Self> {
        match self {
            IndependentSpec::Single(name) => Some(IndependentSpec::Single(name)),
            IndependentSpec::Many(mut names) => match names.len() {
                0 => None,
                1 => Some(IndependentSpec::Single(names.remove(0))),
                _ => Some(IndependentSpec::Many(names)),
            },
        }
    }

    /// Whether this spec denotes more than one predictor.
    pub fn is_multi(&self) -> bool {
        matches!(self, IndependentSpec::Many(_))
    }

    /// The individual column names.
    pub fn names(&self) -> Vec<&str> {
        match self {
            IndependentSpec::Single(name) => vec![name.as_str()],
            IndependentSpec::Many(names) => names.iter().map(|n| n.as_str()).collect(),
        }
    }

    /// The backend argument form: a single name, or names comma-joined.
    pub fn as_argument(&self) -> String {
        match self {
            IndependentSpec::Single(name) => name.clone(),
            IndependentSpec::Many(names) => names.join(","),
        }
    }
}

// =============================================================================
// VariableSet
// =============================================================================

/// An independent/dependent variable pair.
///
/// Produced first as a candidate from free-text extraction, then again by
/// reconciliation, at which point every name is verified to exist in the
/// dataset catalog before the set leaves the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSet {
    pub independent: IndependentSpec,
    pub dependent: String,
}

impl VariableSet {
    /// All column names in the set, independent side first.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names = self.independent.names();
        names.push(self.dependent.as_str());
        names
    }
}

// =============================================================================
// ResolveOutcome
// =============================================================================

/// Exhaustive outcome of one resolver invocation.
///
/// Every non-`Resolved` variant ends the turn with a user-facing message;
/// only `Resolved` proceeds to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Both variables matched real catalog columns.
    Resolved(VariableSet),
    /// No datasets are available; the user must upload data first.
    NoDatasets,
    /// The catalog listing must be shown before extraction can be trusted.
    CatalogPresented(String),
    /// Extraction or reconciliation could not produce a variable set; the
    /// message is surfaced to the user as-is.
    Unresolved(String),
}

/// Structured-mode reply shape shared by both resolver calls.
///
/// A conforming reply carries either `error` or both variable keys.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelReply {
    pub error: Option<String>,
    pub independent_var: Option<IndependentSpec>,
    pub dependent_var: Option<String>,
}
