use serde::{Deserialize, Serialize};

/// A title suggestion for a partial query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Autocomplete {
    /// Paper id of the suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Summary such as `"Vaswani et al., 2017"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors_year: Option<String>,
}
