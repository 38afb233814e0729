//! Common types used throughout the client
//!
//! Shared type aliases and small value types used across modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method used by the API.
///
/// The API only ever reads with `GET` and submits batches with `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl Method {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

// ============================================================================
// Recommendation Pool
// ============================================================================

/// Pool of papers the single-paper recommendation endpoint draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolFrom {
    /// Recently published papers
    #[default]
    Recent,
    /// All computer science papers
    AllCs,
}

impl PoolFrom {
    /// Query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolFrom::Recent => "recent",
            PoolFrom::AllCs => "all-cs",
        }
    }
}

impl std::str::FromStr for PoolFrom {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(PoolFrom::Recent),
            "all-cs" => Ok(PoolFrom::AllCs),
            _ => Err(crate::error::Error::invalid_argument(
                "The pool_from parameter must be either \"recent\" or \"all-cs\".",
            )),
        }
    }
}
