//! Blocking client
//!
//! Owns a current-thread tokio runtime and drives [`AsyncSemanticScholar`]
//! on it. Paginated endpoints return [`BlockingPaginatedResults`] sharing the
//! same runtime. Calling into this client from inside an async context
//! panics; use the async client there.

use super::async_client::AsyncSemanticScholar;
use super::params::SearchPaperParams;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::RequestExecutor;
use crate::models::{
    Author, Autocomplete, Citation, Dataset, DatasetDiff, Paper, Reference, Release,
};
use crate::pagination::{BlockingPaginatedResults, PaginatedResults};
use crate::types::PoolFrom;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Blocking Semantic Scholar client
#[derive(Clone)]
pub struct SemanticScholar {
    inner: AsyncSemanticScholar,
    runtime: Arc<Runtime>,
}

impl SemanticScholar {
    /// Client with default settings and the API key from the environment
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default().apply_env())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: AsyncSemanticScholar::with_config(config)?,
            runtime: Arc::new(build_runtime()?),
        })
    }

    pub fn with_executor(
        config: ClientConfig,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self> {
        Ok(Self {
            inner: AsyncSemanticScholar::with_executor(config, executor),
            runtime: Arc::new(build_runtime()?),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// The async client this one drives
    pub fn as_async(&self) -> &AsyncSemanticScholar {
        &self.inner
    }

    pub fn get_paper(&self, paper_id: &str, fields: Option<&[&str]>) -> Result<Paper> {
        self.runtime.block_on(self.inner.get_paper(paper_id, fields))
    }

    pub fn get_papers<S>(
        &self,
        paper_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<Vec<Paper>>
    where
        S: AsRef<str> + Sync,
    {
        self.runtime.block_on(self.inner.get_papers(paper_ids, fields))
    }

    pub fn get_papers_with_not_found<S>(
        &self,
        paper_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<(Vec<Paper>, Vec<String>)>
    where
        S: AsRef<str> + Sync,
    {
        self.runtime
            .block_on(self.inner.get_papers_with_not_found(paper_ids, fields))
    }

    pub fn get_paper_authors(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<BlockingPaginatedResults<Author>> {
        let cursor = self
            .runtime
            .block_on(self.inner.get_paper_authors(paper_id, fields, limit))?;
        Ok(self.wrap(cursor))
    }

    pub fn get_paper_citations(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<BlockingPaginatedResults<Citation>> {
        let cursor = self
            .runtime
            .block_on(self.inner.get_paper_citations(paper_id, fields, limit))?;
        Ok(self.wrap(cursor))
    }

    pub fn get_paper_references(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<BlockingPaginatedResults<Reference>> {
        let cursor = self
            .runtime
            .block_on(self.inner.get_paper_references(paper_id, fields, limit))?;
        Ok(self.wrap(cursor))
    }

    pub fn search_paper(
        &self,
        query: &str,
        params: &SearchPaperParams,
    ) -> Result<BlockingPaginatedResults<Paper>> {
        let cursor = self
            .runtime
            .block_on(self.inner.search_paper(query, params))?;
        Ok(self.wrap(cursor))
    }

    pub fn match_paper_title(&self, query: &str, fields: Option<&[&str]>) -> Result<Paper> {
        self.runtime
            .block_on(self.inner.match_paper_title(query, fields))
    }

    pub fn get_autocomplete(&self, query: &str) -> Result<Vec<Autocomplete>> {
        self.runtime.block_on(self.inner.get_autocomplete(query))
    }

    pub fn get_author(&self, author_id: &str, fields: Option<&[&str]>) -> Result<Author> {
        self.runtime.block_on(self.inner.get_author(author_id, fields))
    }

    pub fn get_authors<S>(
        &self,
        author_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<Vec<Author>>
    where
        S: AsRef<str> + Sync,
    {
        self.runtime
            .block_on(self.inner.get_authors(author_ids, fields))
    }

    pub fn get_authors_with_not_found<S>(
        &self,
        author_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<(Vec<Author>, Vec<String>)>
    where
        S: AsRef<str> + Sync,
    {
        self.runtime
            .block_on(self.inner.get_authors_with_not_found(author_ids, fields))
    }

    pub fn get_author_papers(
        &self,
        author_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<BlockingPaginatedResults<Paper>> {
        let cursor = self
            .runtime
            .block_on(self.inner.get_author_papers(author_id, fields, limit))?;
        Ok(self.wrap(cursor))
    }

    pub fn search_author(
        &self,
        query: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<BlockingPaginatedResults<Author>> {
        let cursor = self
            .runtime
            .block_on(self.inner.search_author(query, fields, limit))?;
        Ok(self.wrap(cursor))
    }

    pub fn get_recommended_papers(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
        pool_from: PoolFrom,
    ) -> Result<Vec<Paper>> {
        self.runtime.block_on(
            self.inner
                .get_recommended_papers(paper_id, fields, limit, pool_from),
        )
    }

    pub fn get_recommended_papers_from_lists<S>(
        &self,
        positive_paper_ids: &[S],
        negative_paper_ids: &[S],
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<Vec<Paper>>
    where
        S: AsRef<str> + Sync,
    {
        self.runtime
            .block_on(self.inner.get_recommended_papers_from_lists(
                positive_paper_ids,
                negative_paper_ids,
                fields,
                limit,
            ))
    }

    pub fn get_available_releases(&self) -> Result<Vec<String>> {
        self.runtime.block_on(self.inner.get_available_releases())
    }

    pub fn get_release(&self, release_id: &str) -> Result<Release> {
        self.runtime.block_on(self.inner.get_release(release_id))
    }

    pub fn get_dataset_download_links(
        &self,
        release_id: &str,
        dataset_name: &str,
    ) -> Result<Dataset> {
        self.runtime.block_on(
            self.inner
                .get_dataset_download_links(release_id, dataset_name),
        )
    }

    pub fn get_dataset_diffs(
        &self,
        dataset_name: &str,
        start_release_id: &str,
        end_release_id: &str,
    ) -> Result<DatasetDiff> {
        self.runtime.block_on(self.inner.get_dataset_diffs(
            dataset_name,
            start_release_id,
            end_release_id,
        ))
    }

    fn wrap<T: DeserializeOwned>(&self, cursor: PaginatedResults<T>) -> BlockingPaginatedResults<T> {
        BlockingPaginatedResults::from_async(cursor, Arc::clone(&self.runtime))
    }
}

impl std::fmt::Debug for SemanticScholar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SemanticScholar").field(&self.inner).finish()
    }
}

fn build_runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}
