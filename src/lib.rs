// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # semanticscholar
//!
//! Client for the Semantic Scholar Academic Graph, Recommendations and
//! Datasets APIs.
//!
//! ## Features
//!
//! - **Typed endpoints**: papers, authors, citations, references, search,
//!   title match, autocomplete, recommendations and dataset releases
//! - **Resilient requests**: rate-limited (429) requests are retried with a
//!   fixed delay, every other failure maps to a typed [`Error`]
//! - **Lazy pagination**: listings are cursors that fetch the next page only
//!   when iteration runs past the records already loaded
//! - **Async and blocking**: [`AsyncSemanticScholar`] streams records,
//!   [`SemanticScholar`] iterates them on an owned runtime
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use semanticscholar::{AsyncSemanticScholar, SearchPaperParams, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = AsyncSemanticScholar::new()?;
//!
//!     let paper = client.get_paper("CorpusId:215416146", None).await?;
//!     println!("{:?}", paper.title);
//!
//!     let mut results = client
//!         .search_paper("deep learning", &SearchPaperParams::new().limit(50))
//!         .await?;
//!     let mut stream = std::pin::pin!(results.stream());
//!     while let Some(paper) = stream.next().await {
//!         println!("{:?}", paper?.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        AsyncSemanticScholar          SemanticScholar            │
//! │  validate args → build request   (block_on over the async one)  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────────┬───────┴──────────────┬───────────────────┐
//! │  RequestExecutor     │  PaginatedResults    │  Models           │
//! ├──────────────────────┼──────────────────────┼───────────────────┤
//! │  auth header         │  offset / token      │  Paper, Author    │
//! │  429 retry           │  10,000 window       │  Citation         │
//! │  status → Error      │  stream / iter       │  Release, Dataset │
//! └──────────────────────┴──────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP request executor with retry and rate limiting
pub mod http;

/// Paginated result cursors
pub mod pagination;

/// API response models
pub mod models;

/// Async and blocking clients
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use client::{AsyncSemanticScholar, SearchPaperParams, SemanticScholar};
pub use config::ClientConfig;
pub use http::{ApiRequester, RequestDescriptor, RequestExecutor};
pub use models::{Author, Autocomplete, Citation, Dataset, DatasetDiff, Paper, Reference, Release};
pub use pagination::{BlockingPaginatedResults, PaginatedResults};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
