//! Citation and reference edges
//!
//! Both edges carry the same context (citation sentences, intents, influence
//! flag) and differ only in which side of the edge the embedded paper is.

use super::paper::Paper;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Edge-level fields requested alongside the embedded paper
pub const REFERENCE_FIELDS: &[&str] =
    &["contexts", "intents", "contextsWithIntent", "isInfluential"];

/// How one paper cites another
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceContext {
    /// Sentences containing the citation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts_with_intent: Option<Vec<JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_influential: Option<bool>,
}

/// A paper citing the queried paper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    #[serde(flatten)]
    pub context: ReferenceContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citing_paper: Option<Paper>,
}

impl Citation {
    pub fn paper(&self) -> Option<&Paper> {
        self.citing_paper.as_ref()
    }
}

/// A paper cited by the queried paper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(flatten)]
    pub context: ReferenceContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cited_paper: Option<Paper>,
}

impl Reference {
    pub fn paper(&self) -> Option<&Paper> {
        self.cited_paper.as_ref()
    }
}

/// Edge fields followed by the embedded paper's search projection
pub fn reference_projection() -> Vec<String> {
    REFERENCE_FIELDS
        .iter()
        .chain(Paper::SEARCH_FIELDS)
        .map(|field| (*field).to_string())
        .collect()
}
