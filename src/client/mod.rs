//! Client module
//!
//! The endpoint surface of the graph, recommendations and datasets APIs in
//! two forms: [`AsyncSemanticScholar`] for async callers and
//! [`SemanticScholar`] for blocking ones. Both validate arguments before any
//! request is sent and return paginated listings as cursors.

mod async_client;
mod blocking;
mod params;

pub use async_client::AsyncSemanticScholar;
pub use blocking::SemanticScholar;
pub use params::{
    check_date_range, SearchPaperParams, BASE_PATH_DATASETS, BASE_PATH_GRAPH,
    BASE_PATH_RECOMMENDATIONS, MAX_AUTHOR_BATCH, MAX_LIST_LIMIT, MAX_PAPER_BATCH,
    MAX_RECOMMENDATION_LIMIT, MAX_SEARCH_LIMIT,
};

#[cfg(test)]
mod tests;
