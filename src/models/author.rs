//! Author records

use super::paper::Paper;
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// An author of the academic graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub papers: Option<Vec<Paper>>,
}

impl Author {
    /// Projection requested by single-author lookups
    pub const FIELDS: &'static [&'static str] = &[
        "affiliations",
        "aliases",
        "authorId",
        "citationCount",
        "externalIds",
        "hIndex",
        "homepage",
        "name",
        "paperCount",
        "papers",
        "papers.abstract",
        "papers.authors",
        "papers.citationCount",
        "papers.corpusId",
        "papers.externalIds",
        "papers.fieldsOfStudy",
        "papers.influentialCitationCount",
        "papers.isOpenAccess",
        "papers.journal",
        "papers.openAccessPdf",
        "papers.paperId",
        "papers.publicationDate",
        "papers.publicationTypes",
        "papers.publicationVenue",
        "papers.referenceCount",
        "papers.s2FieldsOfStudy",
        "papers.title",
        "papers.url",
        "papers.venue",
        "papers.year",
        "url",
    ];

    /// Projection requested by searches, batches and paper author listings
    pub const SEARCH_FIELDS: &'static [&'static str] = &[
        "affiliations",
        "aliases",
        "authorId",
        "citationCount",
        "externalIds",
        "hIndex",
        "homepage",
        "name",
        "paperCount",
        "url",
    ];
}
