//! Pagination types
//!
//! The page envelope returned by list endpoints, the pagination style a query
//! is fixed to, and the immutable description of a paginated query.

use crate::http::QueryParams;
use crate::types::{JsonValue, StringMap};
use serde::Deserialize;

/// Server-enforced ceiling on `offset + limit` for offset-paginated endpoints
pub const HARD_RESULT_WINDOW: u64 = 10_000;

/// Default `max_results` for list endpoints
pub const DEFAULT_MAX_RESULTS: u64 = 10_000;

/// `max_results` of relevance search endpoints
pub const SEARCH_MAX_RESULTS: u64 = 1_000;

/// `max_results` of bulk retrieval
pub const BULK_MAX_RESULTS: u64 = 10_000_000;

/// Default page size
pub const DEFAULT_LIMIT: u64 = 100;

/// One page of results as returned by the server.
///
/// Absent numeric keys read as 0; `next == 0` means "no more pages" for
/// offset-style endpoints. `total` stays `None` when absent so a later page
/// without it does not erase the first page's count.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageEnvelope {
    /// Raw records of this page
    #[serde(default)]
    pub data: Vec<JsonValue>,
    /// Approximate number of matches (meaningful on the first page)
    #[serde(default)]
    pub total: Option<u64>,
    /// Offset of this page's first record
    #[serde(default)]
    pub offset: u64,
    /// Offset of the next page's first record
    #[serde(default)]
    pub next: u64,
    /// Continuation token of bulk endpoints
    #[serde(default)]
    pub token: Option<String>,
}

/// How a query advances from one page to the next.
///
/// Resolved once from the first envelope and fixed for the query's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// Next offset computed as `offset + limit`
    Offset,
    /// Opaque continuation token issued by the server
    Token,
}

impl PaginationStyle {
    /// Style implied by a first page
    pub fn detect(envelope: &PageEnvelope) -> Self {
        if envelope.token.is_some() {
            Self::Token
        } else {
            Self::Offset
        }
    }
}

/// A paginated query: fixed URL, projection, filters and page size
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// Endpoint URL
    pub url: String,
    /// Free-text query, sent first
    pub query: Option<String>,
    /// Filter parameters, sent right after the free-text query
    pub filters: QueryParams,
    /// Field projection, sent comma-joined
    pub fields: Vec<String>,
    /// Requested page size
    pub limit: u64,
    /// Ceiling on results for this query
    pub max_results: u64,
    /// Auth and other headers
    pub headers: StringMap,
}

impl PageQuery {
    /// Create a query for an endpoint with default page size and ceiling
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: None,
            filters: QueryParams::new(),
            fields: Vec::new(),
            limit: DEFAULT_LIMIT,
            max_results: DEFAULT_MAX_RESULTS,
            headers: StringMap::new(),
        }
    }

    /// Set the free-text query
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set filter parameters
    #[must_use]
    pub fn filters(mut self, filters: QueryParams) -> Self {
        self.filters = filters;
        self
    }

    /// Set the field projection
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the results ceiling
    #[must_use]
    pub fn max_results(mut self, max_results: u64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set request headers
    #[must_use]
    pub fn headers(mut self, headers: StringMap) -> Self {
        self.headers = headers;
        self
    }
}
