//! Blocking cursor
//!
//! Thin wrapper that drives [`PaginatedResults`] on a dedicated runtime so
//! callers without an async context see a plain [`Iterator`]. Must not be
//! used from inside a tokio runtime: `block_on` panics there.

use super::cursor::PaginatedResults;
use super::types::{PageQuery, PaginationStyle};
use crate::error::Result;
use crate::http::RequestExecutor;
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use std::ops::Index;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Blocking view of a paginated result set
pub struct BlockingPaginatedResults<T> {
    inner: PaginatedResults<T>,
    runtime: Arc<Runtime>,
}

impl<T: DeserializeOwned> BlockingPaginatedResults<T> {
    /// Fetch the first page on `runtime`
    pub fn create(
        runtime: Arc<Runtime>,
        executor: Arc<dyn RequestExecutor>,
        query: PageQuery,
    ) -> Result<Self> {
        let inner = runtime.block_on(PaginatedResults::create(executor, query))?;
        Ok(Self { inner, runtime })
    }

    /// Wrap an existing async cursor
    pub fn from_async(inner: PaginatedResults<T>, runtime: Arc<Runtime>) -> Self {
        Self { inner, runtime }
    }

    /// Whether another page can be requested
    pub fn has_next_page(&self) -> bool {
        self.inner.has_next_page()
    }

    /// Fetch the next page and return only its records
    pub fn next_page(&mut self) -> Result<&[T]> {
        self.runtime.block_on(self.inner.next_page())
    }

    /// Every record, fetching further pages as needed
    pub fn iter(&mut self) -> Iter<'_, T>
    where
        T: Clone,
    {
        Iter {
            cursor: &mut self.inner,
            runtime: &self.runtime,
            position: 0,
            done: false,
        }
    }
}

impl<T> BlockingPaginatedResults<T> {
    /// Approximate number of matches reported by the server
    pub fn total(&self) -> u64 {
        self.inner.total()
    }

    /// Offset of the most recently fetched page
    pub fn offset(&self) -> u64 {
        self.inner.offset()
    }

    /// Offset of the next page as reported by the server (0 when none)
    pub fn next(&self) -> u64 {
        self.inner.next()
    }

    /// Current page size
    pub fn limit(&self) -> u64 {
        self.inner.limit()
    }

    /// Ceiling on results for this query
    pub fn max_results(&self) -> u64 {
        self.inner.max_results()
    }

    /// Continuation token of the most recent page
    pub fn token(&self) -> Option<&str> {
        self.inner.token()
    }

    /// Pagination style, fixed by the first page
    pub fn style(&self) -> PaginationStyle {
        self.inner.style()
    }

    /// Every record fetched so far, in fetch order
    pub fn items(&self) -> &[T] {
        self.inner.items()
    }

    /// Raw records of the most recent page
    pub fn raw_data(&self) -> &[JsonValue] {
        self.inner.raw_data()
    }

    /// Number of records fetched so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no records have been fetched
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Record at `index` among those already fetched; never fetches
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index)
    }

    /// The wrapped async cursor
    pub fn as_async(&self) -> &PaginatedResults<T> {
        &self.inner
    }

    /// Unwrap into the async cursor
    pub fn into_async(self) -> PaginatedResults<T> {
        self.inner
    }

    /// Consume the cursor, keeping the fetched records
    pub fn into_items(self) -> Vec<T> {
        self.inner.into_items()
    }
}

impl<T> Index<usize> for BlockingPaginatedResults<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.inner[index]
    }
}

impl<T> std::fmt::Debug for BlockingPaginatedResults<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BlockingPaginatedResults")
            .field(&self.inner)
            .finish()
    }
}

/// Iterator over every record of a [`BlockingPaginatedResults`].
///
/// Starts from the first record already held. An error is yielded once and
/// ends iteration.
pub struct Iter<'a, T> {
    cursor: &'a mut PaginatedResults<T>,
    runtime: &'a Runtime,
    position: usize,
    done: bool,
}

impl<T: DeserializeOwned + Clone> Iterator for Iter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.runtime.block_on(self.cursor.item_or_fetch(self.position)) {
            Ok(Some(item)) => {
                self.position += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a, T: DeserializeOwned + Clone> IntoIterator for &'a mut BlockingPaginatedResults<T> {
    type Item = Result<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
