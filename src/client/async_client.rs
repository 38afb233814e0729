//! Async client
//!
//! Every endpoint builds a [`RequestDescriptor`] (or a [`PageQuery`] for
//! listings), hands it to the shared executor and decodes the payload into
//! the matching model.

use super::params::{
    check_batch, check_limit, not_found_paper_ids, projection, SearchPaperParams,
    BASE_PATH_DATASETS, BASE_PATH_GRAPH, BASE_PATH_RECOMMENDATIONS, MAX_AUTHOR_BATCH,
    MAX_LIST_LIMIT, MAX_PAPER_BATCH, MAX_RECOMMENDATION_LIMIT,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{ApiRequester, RequestDescriptor, RequestExecutor};
use crate::models::{
    reference_projection, Author, Autocomplete, Citation, Dataset, DatasetDiff, Paper, Reference,
    Release,
};
use crate::pagination::{PageEnvelope, PageQuery, PaginatedResults, SEARCH_MAX_RESULTS};
use crate::types::{JsonValue, PoolFrom};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct Recommendations {
    #[serde(default, rename = "recommendedPapers")]
    recommended_papers: Vec<Paper>,
}

#[derive(Deserialize)]
struct Suggestions {
    #[serde(default)]
    matches: Vec<Autocomplete>,
}

/// Async Semantic Scholar client.
///
/// Cheap to clone; clones share the executor and its rate limiter.
#[derive(Clone)]
pub struct AsyncSemanticScholar {
    config: Arc<ClientConfig>,
    requester: Arc<dyn RequestExecutor>,
}

impl AsyncSemanticScholar {
    /// Client with default settings and the API key from the environment
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default().apply_env())
    }

    /// Client for an explicit configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let requester = ApiRequester::new(&config)?;
        Ok(Self::with_executor(config, Arc::new(requester)))
    }

    /// Client sending its requests through a custom executor
    pub fn with_executor(config: ClientConfig, executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            config: Arc::new(config),
            requester: executor,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> Arc<dyn RequestExecutor> {
        Arc::clone(&self.requester)
    }

    // ========================================================================
    // Papers
    // ========================================================================

    /// `GET /graph/v1/paper/{paper_id}`
    ///
    /// `paper_id` may be a S2 paper id or a prefixed external id such as
    /// `CorpusId:215416146`, `DOI:10.18653/v1/N18-3011`, `ARXIV:2106.15928`
    /// or `URL:https://arxiv.org/abs/2106.15928`.
    pub async fn get_paper(&self, paper_id: &str, fields: Option<&[&str]>) -> Result<Paper> {
        let fields = projection(fields, Paper::FIELDS);
        let request = self
            .request(self.graph_url(&format!("/paper/{paper_id}")))
            .param("fields", fields.join(","));
        self.fetch(&request).await
    }

    /// `POST /graph/v1/paper/batch` for 1 to 500 ids
    pub async fn get_papers<S>(
        &self,
        paper_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<Vec<Paper>>
    where
        S: AsRef<str> + Sync,
    {
        let (papers, _) = self.get_papers_with_not_found(paper_ids, fields).await?;
        Ok(papers)
    }

    /// Like [`get_papers`](Self::get_papers), also returning the ids no paper
    /// answered to (ids in `URL:` form are never matched)
    pub async fn get_papers_with_not_found<S>(
        &self,
        paper_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<(Vec<Paper>, Vec<String>)>
    where
        S: AsRef<str> + Sync,
    {
        check_batch(paper_ids.len(), MAX_PAPER_BATCH, "paper_ids")?;

        let fields = projection(fields, Paper::SEARCH_FIELDS);
        let ids: Vec<&str> = paper_ids.iter().map(AsRef::as_ref).collect();
        let request = self
            .request(self.graph_url("/paper/batch"))
            .param("fields", fields.join(","))
            .json(json!({ "ids": ids }));

        let data = self.requester.execute(&request).await?;
        let papers: Vec<Paper> = decode_list::<Option<Paper>>(data)?
            .into_iter()
            .flatten()
            .collect();

        let not_found = not_found_paper_ids(paper_ids, &papers);
        if !not_found.is_empty() {
            warn!("IDs not found: {:?}", not_found);
        }

        Ok((papers, not_found))
    }

    /// `GET /graph/v1/paper/{paper_id}/authors`
    pub async fn get_paper_authors(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<PaginatedResults<Author>> {
        check_limit(limit, MAX_LIST_LIMIT)?;
        let query = self
            .page_query(self.graph_url(&format!("/paper/{paper_id}/authors")))
            .fields(projection(fields, Author::SEARCH_FIELDS))
            .limit(limit);
        PaginatedResults::create(self.executor(), query).await
    }

    /// `GET /graph/v1/paper/{paper_id}/citations`
    pub async fn get_paper_citations(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<PaginatedResults<Citation>> {
        check_limit(limit, MAX_LIST_LIMIT)?;
        let query = self
            .page_query(self.graph_url(&format!("/paper/{paper_id}/citations")))
            .fields(edge_projection(fields))
            .limit(limit);
        PaginatedResults::create(self.executor(), query).await
    }

    /// `GET /graph/v1/paper/{paper_id}/references`
    pub async fn get_paper_references(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<PaginatedResults<Reference>> {
        check_limit(limit, MAX_LIST_LIMIT)?;
        let query = self
            .page_query(self.graph_url(&format!("/paper/{paper_id}/references")))
            .fields(edge_projection(fields))
            .limit(limit);
        PaginatedResults::create(self.executor(), query).await
    }

    /// `GET /graph/v1/paper/search` (relevance, up to 1,000 results) or
    /// `GET /graph/v1/paper/search/bulk` (token paginated, up to 10,000,000)
    pub async fn search_paper(
        &self,
        query: &str,
        params: &SearchPaperParams,
    ) -> Result<PaginatedResults<Paper>> {
        let filters = params.filters()?;
        let page_query = self
            .page_query(self.graph_url(params.path()))
            .query(query)
            .filters(filters)
            .fields(params.projection())
            .limit(params.limit)
            .max_results(params.max_results());
        PaginatedResults::create(self.executor(), page_query).await
    }

    /// `GET /graph/v1/paper/search/match`: the paper whose title best matches
    pub async fn match_paper_title(&self, query: &str, fields: Option<&[&str]>) -> Result<Paper> {
        let fields = projection(fields, Paper::SEARCH_FIELDS);
        let request = self
            .request(self.graph_url("/paper/search/match"))
            .param("query", query)
            .param("fields", fields.join(","));

        let data = self.requester.execute(&request).await?;
        let envelope: PageEnvelope = serde_json::from_value(data)?;
        let best = envelope.data.into_iter().next().ok_or_else(|| Error::NotFound {
            message: "Title match not found".to_string(),
        })?;
        Ok(serde_json::from_value(best)?)
    }

    /// `GET /graph/v1/paper/autocomplete`
    pub async fn get_autocomplete(&self, query: &str) -> Result<Vec<Autocomplete>> {
        let request = self
            .request(self.graph_url("/paper/autocomplete"))
            .param("query", query);
        let suggestions: Suggestions = self.fetch(&request).await?;
        Ok(suggestions.matches)
    }

    // ========================================================================
    // Authors
    // ========================================================================

    /// `GET /graph/v1/author/{author_id}`
    pub async fn get_author(&self, author_id: &str, fields: Option<&[&str]>) -> Result<Author> {
        let fields = projection(fields, Author::FIELDS);
        let request = self
            .request(self.graph_url(&format!("/author/{author_id}")))
            .param("fields", fields.join(","));
        self.fetch(&request).await
    }

    /// `POST /graph/v1/author/batch` for 1 to 1,000 ids
    pub async fn get_authors<S>(
        &self,
        author_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<Vec<Author>>
    where
        S: AsRef<str> + Sync,
    {
        let (authors, _) = self.get_authors_with_not_found(author_ids, fields).await?;
        Ok(authors)
    }

    /// Like [`get_authors`](Self::get_authors), also returning the ids no
    /// author answered to
    pub async fn get_authors_with_not_found<S>(
        &self,
        author_ids: &[S],
        fields: Option<&[&str]>,
    ) -> Result<(Vec<Author>, Vec<String>)>
    where
        S: AsRef<str> + Sync,
    {
        check_batch(author_ids.len(), MAX_AUTHOR_BATCH, "author_ids")?;

        let fields = projection(fields, Author::SEARCH_FIELDS);
        let ids: Vec<&str> = author_ids.iter().map(AsRef::as_ref).collect();
        let request = self
            .request(self.graph_url("/author/batch"))
            .param("fields", fields.join(","))
            .json(json!({ "ids": ids }));

        let data = self.requester.execute(&request).await?;
        let authors: Vec<Author> = decode_list::<Option<Author>>(data)?
            .into_iter()
            .flatten()
            .collect();

        let not_found: Vec<String> = ids
            .iter()
            .filter(|id| {
                !authors
                    .iter()
                    .any(|author| author.author_id.as_deref() == Some(**id))
            })
            .map(|id| (*id).to_string())
            .collect();
        if !not_found.is_empty() {
            warn!("IDs not found: {:?}", not_found);
        }

        Ok((authors, not_found))
    }

    /// `GET /graph/v1/author/{author_id}/papers`
    pub async fn get_author_papers(
        &self,
        author_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<PaginatedResults<Paper>> {
        check_limit(limit, MAX_LIST_LIMIT)?;
        let query = self
            .page_query(self.graph_url(&format!("/author/{author_id}/papers")))
            .fields(projection(fields, Paper::SEARCH_FIELDS))
            .limit(limit);
        PaginatedResults::create(self.executor(), query).await
    }

    /// `GET /graph/v1/author/search`, up to 1,000 results
    pub async fn search_author(
        &self,
        query: &str,
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<PaginatedResults<Author>> {
        check_limit(limit, MAX_LIST_LIMIT)?;
        let page_query = self
            .page_query(self.graph_url("/author/search"))
            .query(query)
            .fields(projection(fields, Author::SEARCH_FIELDS))
            .limit(limit)
            .max_results(SEARCH_MAX_RESULTS);
        PaginatedResults::create(self.executor(), page_query).await
    }

    // ========================================================================
    // Recommendations
    // ========================================================================

    /// `GET /recommendations/v1/papers/forpaper/{paper_id}`
    pub async fn get_recommended_papers(
        &self,
        paper_id: &str,
        fields: Option<&[&str]>,
        limit: u64,
        pool_from: PoolFrom,
    ) -> Result<Vec<Paper>> {
        check_limit(limit, MAX_RECOMMENDATION_LIMIT)?;
        let fields = projection(fields, Paper::SEARCH_FIELDS);
        let request = self
            .request(self.recommendations_url(&format!("/papers/forpaper/{paper_id}")))
            .param("fields", fields.join(","))
            .param("limit", limit.to_string())
            .param("from", pool_from.as_str());
        let recommendations: Recommendations = self.fetch(&request).await?;
        Ok(recommendations.recommended_papers)
    }

    /// `POST /recommendations/v1/papers/` from positive and negative examples
    pub async fn get_recommended_papers_from_lists<S>(
        &self,
        positive_paper_ids: &[S],
        negative_paper_ids: &[S],
        fields: Option<&[&str]>,
        limit: u64,
    ) -> Result<Vec<Paper>>
    where
        S: AsRef<str> + Sync,
    {
        check_limit(limit, MAX_RECOMMENDATION_LIMIT)?;
        let fields = projection(fields, Paper::SEARCH_FIELDS);
        let positive: Vec<&str> = positive_paper_ids.iter().map(AsRef::as_ref).collect();
        let negative: Vec<&str> = negative_paper_ids.iter().map(AsRef::as_ref).collect();
        let request = self
            .request(self.recommendations_url("/papers/"))
            .param("fields", fields.join(","))
            .param("limit", limit.to_string())
            .json(json!({
                "positivePaperIds": positive,
                "negativePaperIds": negative,
            }));
        let recommendations: Recommendations = self.fetch(&request).await?;
        Ok(recommendations.recommended_papers)
    }

    // ========================================================================
    // Datasets
    // ========================================================================

    /// `GET /datasets/v1/release/`: release ids, oldest first
    pub async fn get_available_releases(&self) -> Result<Vec<String>> {
        let request = self.request(self.datasets_url("/release/"));
        let data = self.requester.execute(&request).await?;
        decode_list(data)
    }

    /// `GET /datasets/v1/release/{release_id}`; `latest` is accepted
    pub async fn get_release(&self, release_id: &str) -> Result<Release> {
        let request = self.request(self.datasets_url(&format!("/release/{release_id}")));
        self.fetch(&request).await
    }

    /// `GET /datasets/v1/release/{release_id}/dataset/{dataset_name}`
    pub async fn get_dataset_download_links(
        &self,
        release_id: &str,
        dataset_name: &str,
    ) -> Result<Dataset> {
        let request = self.request(
            self.datasets_url(&format!("/release/{release_id}/dataset/{dataset_name}")),
        );
        self.fetch(&request).await
    }

    /// `GET /datasets/v1/diffs/{start}/to/{end}/{dataset_name}`
    pub async fn get_dataset_diffs(
        &self,
        dataset_name: &str,
        start_release_id: &str,
        end_release_id: &str,
    ) -> Result<DatasetDiff> {
        let request = self.request(self.datasets_url(&format!(
            "/diffs/{start_release_id}/to/{end_release_id}/{dataset_name}"
        )));
        self.fetch(&request).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn graph_url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url(), BASE_PATH_GRAPH, path)
    }

    fn recommendations_url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url(), BASE_PATH_RECOMMENDATIONS, path)
    }

    fn datasets_url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url(), BASE_PATH_DATASETS, path)
    }

    fn request(&self, url: String) -> RequestDescriptor {
        RequestDescriptor::new(url).headers(&self.config.auth_headers())
    }

    fn page_query(&self, url: String) -> PageQuery {
        PageQuery::new(url).headers(self.config.auth_headers())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        let data = self.requester.execute(request).await?;
        debug!("Decoding response of {}", request.url);
        Ok(serde_json::from_value(data)?)
    }
}

impl std::fmt::Debug for AsyncSemanticScholar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncSemanticScholar")
            .field("api_url", &self.config.api_url)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish_non_exhaustive()
    }
}

fn edge_projection(fields: Option<&[&str]>) -> Vec<String> {
    match fields {
        Some(fields) if !fields.is_empty() => fields.iter().map(|f| (*f).to_string()).collect(),
        _ => reference_projection(),
    }
}

/// Decode a JSON array; an empty object (error-only success body) is an empty list
fn decode_list<T: DeserializeOwned>(data: JsonValue) -> Result<Vec<T>> {
    if data.as_object().is_some_and(serde_json::Map::is_empty) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(data)?)
}
