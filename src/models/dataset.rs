//! Datasets API records
//!
//! These payloads use snake_case keys, except `README`.

use serde::{Deserialize, Serialize};

/// One dataset release and the datasets it contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_id: Option<String>,
    #[serde(rename = "README", skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<Dataset>>,
}

/// A dataset of a release; `files` holds pre-signed download links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "README", skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

/// Every incremental update of a dataset between two releases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffs: Option<Vec<IncrementalUpdate>>,
}

/// Files to upsert and delete to move between two sequential releases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_files: Option<Vec<String>>,
}
