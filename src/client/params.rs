//! Endpoint paths, argument validation and search filters

use crate::error::{Error, Result};
use crate::http::QueryParams;
use crate::models::Paper;
use crate::pagination::{BULK_MAX_RESULTS, DEFAULT_LIMIT, SEARCH_MAX_RESULTS};
use crate::types::JsonValue;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::warn;

pub const BASE_PATH_GRAPH: &str = "/graph/v1";
pub const BASE_PATH_RECOMMENDATIONS: &str = "/recommendations/v1";
pub const BASE_PATH_DATASETS: &str = "/datasets/v1";

/// Upper bound on `limit` for graph listings and author search
pub const MAX_LIST_LIMIT: u64 = 1000;
/// Upper bound on `limit` for paper search
pub const MAX_SEARCH_LIMIT: u64 = 100;
/// Upper bound on `limit` for recommendations
pub const MAX_RECOMMENDATION_LIMIT: u64 = 500;
/// Upper bound on ids per paper batch
pub const MAX_PAPER_BATCH: usize = 500;
/// Upper bound on ids per author batch
pub const MAX_AUTHOR_BATCH: usize = 1000;

/// `<start>:<end>` where each side is `YYYY`, `YYYY-MM` or `YYYY-MM-DD` and may be empty
static DATE_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}(-\d{2}(-\d{2})?)?)?(:(\d{4}(-\d{2}(-\d{2})?)?)?)?$")
        .expect("date range pattern is valid")
});

pub(crate) fn check_limit(limit: u64, max: u64) -> Result<()> {
    if !(1..=max).contains(&limit) {
        return Err(Error::invalid_argument(format!(
            "The limit parameter must be between 1 and {max} inclusive."
        )));
    }
    Ok(())
}

pub(crate) fn check_batch(len: usize, max: usize, name: &str) -> Result<()> {
    if len == 0 || len > max {
        return Err(Error::invalid_argument(format!(
            "The {name} parameter must be a list of 1 to {max} IDs."
        )));
    }
    Ok(())
}

/// Validate a `publicationDateOrYear` range such as `2019-03:2020` or `:2021-06-30`
pub fn check_date_range(value: &str) -> Result<()> {
    if !DATE_RANGE_REGEX.is_match(value) {
        return Err(Error::invalid_argument(
            "The publication_date_or_year parameter must be in the format \
             <start_date>:<end_date>, where dates are in the format YYYY-MM-DD, YYYY-MM, or YYYY.",
        ));
    }
    Ok(())
}

/// Caller's projection, or `default` when none is given
pub(crate) fn projection(fields: Option<&[&str]>, default: &[&str]) -> Vec<String> {
    match fields {
        Some(fields) if !fields.is_empty() => fields.iter().map(|f| (*f).to_string()).collect(),
        _ => default.iter().map(|f| (*f).to_string()).collect(),
    }
}

/// Requested ids that no returned paper answers to.
///
/// A paper answers to its paper id and to each external id, prefixed the way
/// callers spell it (`ARXIV:`, `PMID:`, `CorpusId:` ...) when the source has
/// a prefix. Comparison ignores case.
pub(crate) fn not_found_paper_ids<S: AsRef<str>>(ids: &[S], papers: &[Paper]) -> Vec<String> {
    let mut found = HashSet::new();
    for paper in papers {
        if let Some(ref id) = paper.paper_id {
            found.insert(id.to_lowercase());
        }
        let Some(ref external) = paper.external_ids else {
            continue;
        };
        for (source, value) in external {
            let value = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Null => continue,
                other => other.to_string(),
            };
            let id = match id_prefix(source) {
                Some(prefix) => format!("{prefix}:{value}"),
                None => value,
            };
            found.insert(id.to_lowercase());
        }
    }

    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| !found.contains(&id.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn id_prefix(source: &str) -> Option<&'static str> {
    match source.to_lowercase().as_str() {
        "arxiv" => Some("ARXIV"),
        "mag" => Some("MAG"),
        "acl" => Some("ACL"),
        "pubmed" => Some("PMID"),
        "pubmedcentral" => Some("PMCID"),
        "corpusid" => Some("CorpusId"),
        _ => None,
    }
}

// ============================================================================
// Paper Search
// ============================================================================

/// Options of a paper search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPaperParams {
    /// Publication year or range, e.g. `2019` or `2016-2020`
    pub year: Option<String>,
    pub publication_types: Vec<String>,
    /// Only papers with a public PDF
    pub open_access_pdf: bool,
    pub venue: Vec<String>,
    pub fields_of_study: Vec<String>,
    /// Projection; `Paper::SEARCH_FIELDS` when `None`
    pub fields: Option<Vec<String>>,
    /// `<start>:<end>` date range
    pub publication_date_or_year: Option<String>,
    pub min_citation_count: Option<u64>,
    /// Page size, 1..=100
    pub limit: u64,
    /// Bulk retrieval: token pagination, up to 10,000,000 results
    pub bulk: bool,
    /// `<field>:<asc|desc>`, bulk only
    pub sort: Option<String>,
}

impl Default for SearchPaperParams {
    fn default() -> Self {
        Self {
            year: None,
            publication_types: Vec::new(),
            open_access_pdf: false,
            venue: Vec::new(),
            fields_of_study: Vec::new(),
            fields: None,
            publication_date_or_year: None,
            min_citation_count: None,
            limit: DEFAULT_LIMIT,
            bulk: false,
            sort: None,
        }
    }
}

impl SearchPaperParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    #[must_use]
    pub fn publication_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.publication_types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn open_access_pdf(mut self, open_access_pdf: bool) -> Self {
        self.open_access_pdf = open_access_pdf;
        self
    }

    #[must_use]
    pub fn venue<I, S>(mut self, venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.venue = venues.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fields_of_study<I, S>(mut self, fields_of_study: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_of_study = fields_of_study.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn publication_date_or_year(mut self, range: impl Into<String>) -> Self {
        self.publication_date_or_year = Some(range.into());
        self
    }

    #[must_use]
    pub fn min_citation_count(mut self, count: u64) -> Self {
        self.min_citation_count = Some(count);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn bulk(mut self, bulk: bool) -> Self {
        self.bulk = bulk;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Endpoint path below the graph root
    pub fn path(&self) -> &'static str {
        if self.bulk {
            "/paper/search/bulk"
        } else {
            "/paper/search"
        }
    }

    /// Results ceiling of the chosen endpoint
    pub fn max_results(&self) -> u64 {
        if self.bulk {
            BULK_MAX_RESULTS
        } else {
            SEARCH_MAX_RESULTS
        }
    }

    /// Projection to request
    pub fn projection(&self) -> Vec<String> {
        match self.fields {
            Some(ref fields) if !fields.is_empty() => fields.clone(),
            _ => projection(None, Paper::SEARCH_FIELDS),
        }
    }

    /// Validate and render the filter parameters, in the order the API
    /// documents them
    pub fn filters(&self) -> Result<QueryParams> {
        check_limit(self.limit, MAX_SEARCH_LIMIT)?;

        let mut params = QueryParams::new();

        if let Some(ref sort) = self.sort {
            if self.bulk {
                params.push("sort", sort);
            } else {
                warn!("The sort parameter is only used with bulk search, ignoring it");
            }
        }
        if let Some(ref year) = self.year {
            params.push("year", year);
        }
        if !self.publication_types.is_empty() {
            params.push("publicationTypes", self.publication_types.join(","));
        }
        if self.open_access_pdf {
            params.push_flag("openAccessPdf");
        }
        if !self.venue.is_empty() {
            params.push("venue", self.venue.join(","));
        }
        if !self.fields_of_study.is_empty() {
            params.push("fieldsOfStudy", self.fields_of_study.join(","));
        }
        if let Some(ref range) = self.publication_date_or_year {
            check_date_range(range)?;
            params.push("publicationDateOrYear", range);
        }
        if let Some(count) = self.min_citation_count.filter(|c| *c > 0) {
            params.push("minCitationCount", count.to_string());
        }

        Ok(params)
    }
}
