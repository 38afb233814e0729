//! Paginated cursor
//!
//! [`PaginatedResults`] drives repeated page fetches through a
//! [`RequestExecutor`], keeps the offset/token arithmetic, and accumulates
//! typed records in fetch order. The first page is fetched by
//! [`PaginatedResults::create`] so `total` is known before the caller sees
//! anything.

use super::types::{PageEnvelope, PageQuery, PaginationStyle, HARD_RESULT_WINDOW};
use crate::error::{Error, Result};
use crate::http::{QueryParams, RequestDescriptor, RequestExecutor};
use crate::types::JsonValue;
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::ops::Index;
use std::sync::Arc;
use tracing::debug;

/// Lazily paginated result set of records of type `T`
pub struct PaginatedResults<T> {
    executor: Arc<dyn RequestExecutor>,
    query: PageQuery,
    limit: u64,
    /// Offset of the last fetched page; `None` until the first page arrives
    offset: Option<u64>,
    next: u64,
    total: u64,
    token: Option<String>,
    style: Option<PaginationStyle>,
    raw_data: Vec<JsonValue>,
    items: Vec<T>,
}

impl<T: DeserializeOwned> PaginatedResults<T> {
    /// Bind a query to an executor and fetch its first page
    pub async fn create(executor: Arc<dyn RequestExecutor>, query: PageQuery) -> Result<Self> {
        if query.limit == 0 {
            return Err(Error::invalid_argument("The limit parameter must be at least 1."));
        }
        let mut results = Self {
            executor,
            limit: query.limit,
            query,
            offset: None,
            next: 0,
            total: 0,
            token: None,
            style: None,
            raw_data: Vec::new(),
            items: Vec::new(),
        };
        results.fetch_page().await?;
        Ok(results)
    }

    /// Whether another page can be requested.
    ///
    /// Requires at least one result so far, a continuation signal matching
    /// the query's style (token present, or `next == offset + limit`), and
    /// `offset + limit` still below `max_results - 1`. Never fails: an
    /// `offset + limit` that overflows means there is no next page.
    pub fn has_next_page(&self) -> bool {
        let Some(offset) = self.offset else {
            return false;
        };

        let Some(window_end) = offset.checked_add(self.limit) else {
            return false;
        };
        let has_any_result = self.total > 0 || !self.items.is_empty();
        let has_more_results = match self.style() {
            PaginationStyle::Token => self.token.is_some(),
            PaginationStyle::Offset => self.next == window_end,
        };
        let under_limit = window_end < self.query.max_results.saturating_sub(1);

        has_any_result && has_more_results && under_limit
    }

    /// Fetch the next page and return only its records
    pub async fn next_page(&mut self) -> Result<&[T]> {
        if !self.has_next_page() {
            return Err(Error::NoMorePages);
        }
        self.fetch_page().await
    }

    /// Core step shared by both iteration surfaces: the record at
    /// `position`, fetching pages until it exists or pagination ends.
    pub(crate) async fn item_or_fetch(&mut self, position: usize) -> Result<Option<T>>
    where
        T: Clone,
    {
        loop {
            if let Some(item) = self.items.get(position) {
                return Ok(Some(item.clone()));
            }
            if !self.has_next_page() {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    /// Every record: already fetched ones first, then each further page in
    /// fetch order. An error is yielded once and ends the stream.
    pub fn stream(&mut self) -> impl Stream<Item = Result<T>> + '_
    where
        T: Clone,
    {
        stream::unfold(
            (self, 0usize, false),
            |(cursor, position, done)| async move {
                if done {
                    return None;
                }
                match cursor.item_or_fetch(position).await {
                    Ok(Some(item)) => Some((Ok(item), (cursor, position + 1, false))),
                    Ok(None) => None,
                    Err(e) => Some((Err(e), (cursor, position, true))),
                }
            },
        )
    }

    async fn fetch_page(&mut self) -> Result<&[T]> {
        let offset = match self.offset {
            None => 0,
            Some(previous) => previous.checked_add(self.limit).ok_or_else(|| {
                Error::Other(format!("Page offset overflows after offset {previous}"))
            })?,
        };
        let mut limit = self.limit;
        if offset.checked_add(limit) == Some(HARD_RESULT_WINDOW) {
            limit -= 1;
        }

        let request = self.build_request(offset, limit);
        let payload = self.executor.execute(&request).await?;
        let envelope: PageEnvelope = serde_json::from_value(payload)?;
        let records = envelope
            .data
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<T>>>()?;

        // Nothing above mutated state; commit the page atomically
        if self.style.is_none() {
            self.style = Some(PaginationStyle::detect(&envelope));
        }
        if limit != self.limit {
            debug!(
                "Shrinking page size from {} to {} at the {} result window",
                self.limit, limit, HARD_RESULT_WINDOW
            );
            self.limit = limit;
        }
        if let Some(total) = envelope.total {
            self.total = total;
        }
        self.offset = Some(envelope.offset);
        self.next = envelope.next;
        self.token = envelope.token;
        self.raw_data = envelope.data;

        let start = self.items.len();
        self.items.extend(records);

        debug!(
            "Fetched page at offset {}: {} records ({} accumulated, total {})",
            offset,
            self.items.len() - start,
            self.items.len(),
            self.total
        );

        Ok(&self.items[start..])
    }

    fn build_request(&self, offset: u64, limit: u64) -> RequestDescriptor {
        let mut params = QueryParams::new();
        if let Some(ref query) = self.query.query {
            params.push("query", query);
        }
        params.extend(&self.query.filters);
        if let Some(ref token) = self.token {
            params.push("token", token);
        }
        if !self.query.fields.is_empty() {
            params.push("fields", self.query.fields.join(","));
        }
        params.push("offset", offset.to_string());
        params.push("limit", limit.to_string());

        RequestDescriptor::new(self.query.url.clone())
            .params(params)
            .headers(&self.query.headers)
    }
}

impl<T> PaginatedResults<T> {
    /// Approximate number of matches reported by the server
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Offset of the most recently fetched page
    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    /// Offset of the next page as reported by the server (0 when none)
    pub fn next(&self) -> u64 {
        self.next
    }

    /// Current page size
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Ceiling on results for this query
    pub fn max_results(&self) -> u64 {
        self.query.max_results
    }

    /// Continuation token of the most recent page
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Pagination style, fixed by the first page
    pub fn style(&self) -> PaginationStyle {
        self.style.unwrap_or(PaginationStyle::Offset)
    }

    /// The bound query
    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    /// Every record fetched so far, in fetch order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Raw records of the most recent page
    pub fn raw_data(&self) -> &[JsonValue] {
        &self.raw_data
    }

    /// Number of records fetched so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no records have been fetched
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record at `index` among those already fetched; never fetches
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Consume the cursor, keeping the fetched records
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Index<usize> for PaginatedResults<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> std::fmt::Debug for PaginatedResults<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedResults")
            .field("url", &self.query.url)
            .field("total", &self.total)
            .field("offset", &self.offset)
            .field("next", &self.next)
            .field("limit", &self.limit)
            .field("token", &self.token)
            .field("style", &self.style)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}
