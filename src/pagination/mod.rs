//! Pagination module
//!
//! Supports: Offset (`offset`/`limit`/`next`) and Token (`token`) pagination
//!
//! # Overview
//!
//! A [`PageQuery`] describes what to fetch; a [`PaginatedResults`] cursor
//! binds it to a [`RequestExecutor`](crate::http::RequestExecutor), fetches
//! the first page eagerly and the rest on demand. Records are consumed with
//! [`PaginatedResults::stream`] in async code or through
//! [`BlockingPaginatedResults::iter`] in blocking code; both walk the same
//! cursor state, so re-iterating never refetches a page.

mod blocking;
mod cursor;
mod types;

pub use blocking::{BlockingPaginatedResults, Iter};
pub use cursor::PaginatedResults;
pub use types::{
    PageEnvelope, PageQuery, PaginationStyle, BULK_MAX_RESULTS, DEFAULT_LIMIT,
    DEFAULT_MAX_RESULTS, HARD_RESULT_WINDOW, SEARCH_MAX_RESULTS,
};
