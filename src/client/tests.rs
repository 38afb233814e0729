//! Tests for client module

use super::params::{check_batch, check_limit, not_found_paper_ids};
use super::*;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::models::Paper;
use crate::types::PoolFrom;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .api_url(server.uri())
        .api_key("secret")
        .retry_policy(2, Duration::from_millis(10))
        .build()
}

fn client(server: &MockServer) -> AsyncSemanticScholar {
    AsyncSemanticScholar::with_config(config(server)).unwrap()
}

async fn received_query(server: &MockServer, index: usize) -> String {
    let requests = server.received_requests().await.unwrap();
    requests[index].url.query().unwrap_or_default().to_string()
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test_case(0, 100, false ; "zero")]
#[test_case(1, 100, true ; "lower bound")]
#[test_case(100, 100, true ; "search upper bound")]
#[test_case(101, 100, false ; "over search bound")]
#[test_case(500, 500, true ; "recommendation upper bound")]
#[test_case(1000, 1000, true ; "listing upper bound")]
#[test_case(1001, 1000, false ; "over listing bound")]
fn test_check_limit(limit: u64, max: u64, ok: bool) {
    let result = check_limit(limit, max);
    assert_eq!(result.is_ok(), ok);
    if let Err(e) = result {
        assert_eq!(
            e.to_string(),
            format!("Invalid argument: The limit parameter must be between 1 and {max} inclusive.")
        );
    }
}

#[test_case("2019" ; "year")]
#[test_case("2019-03" ; "month")]
#[test_case("2019-03-05" ; "day")]
#[test_case("2019:" ; "open end")]
#[test_case(":2020-06" ; "open start")]
#[test_case("2019-03-05:2020-06" ; "mixed range")]
#[test_case("" ; "empty")]
fn test_date_range_accepted(value: &str) {
    assert!(check_date_range(value).is_ok());
}

#[test_case("19" ; "short year")]
#[test_case("2019/03" ; "slash")]
#[test_case("2019-3" ; "single digit month")]
#[test_case("2019:2020:2021" ; "three parts")]
#[test_case("last year" ; "words")]
fn test_date_range_rejected(value: &str) {
    assert!(matches!(
        check_date_range(value),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_check_batch() {
    assert!(check_batch(1, MAX_PAPER_BATCH, "paper_ids").is_ok());
    assert!(check_batch(500, MAX_PAPER_BATCH, "paper_ids").is_ok());

    let err = check_batch(0, MAX_PAPER_BATCH, "paper_ids").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid argument: The paper_ids parameter must be a list of 1 to 500 IDs."
    );
    assert!(check_batch(1001, MAX_AUTHOR_BATCH, "author_ids").is_err());
}

#[test]
fn test_not_found_ids_use_external_prefixes() {
    let papers: Vec<Paper> = serde_json::from_value(json!([
        {
            "paperId": "ABC123",
            "externalIds": { "ArXiv": "1706.03762", "PubMed": "123", "DOI": "10.1/XYZ", "CorpusId": 42 }
        }
    ]))
    .unwrap();

    let ids = [
        "abc123",
        "ARXIV:1706.03762",
        "pmid:123",
        "10.1/xyz",
        "CorpusId:42",
        "CorpusId:999",
        "missing",
    ];
    assert_eq!(
        not_found_paper_ids(&ids, &papers),
        vec!["CorpusId:999".to_string(), "missing".to_string()]
    );
}

// ============================================================================
// Search Params Tests
// ============================================================================

#[test]
fn test_search_params_defaults() {
    let params = SearchPaperParams::new();
    assert_eq!(params.limit, 100);
    assert_eq!(params.path(), "/paper/search");
    assert_eq!(params.max_results(), 1_000);
    assert_eq!(params.projection().len(), Paper::SEARCH_FIELDS.len());
    assert!(params.filters().unwrap().is_empty());
}

#[test]
fn test_search_params_filters_in_order() {
    let params = SearchPaperParams::new()
        .min_citation_count(10)
        .publication_date_or_year("2020-01:2020-06")
        .fields_of_study(["Medicine"])
        .venue(["Nature", "Radiology"])
        .open_access_pdf(true)
        .publication_types(["Review", "JournalArticle"])
        .year("2020");

    assert_eq!(
        params.filters().unwrap().render(),
        "year=2020&publicationTypes=Review,JournalArticle&openAccessPdf&venue=Nature,Radiology\
         &fieldsOfStudy=Medicine&publicationDateOrYear=2020-01%3A2020-06&minCitationCount=10"
    );
}

#[test]
fn test_search_params_sort_only_for_bulk() {
    let relevance = SearchPaperParams::new().sort("citationCount:desc").year("2020");
    assert_eq!(relevance.filters().unwrap().render(), "year=2020");

    let bulk = relevance.bulk(true);
    assert_eq!(bulk.path(), "/paper/search/bulk");
    assert_eq!(bulk.max_results(), 10_000_000);
    assert_eq!(
        bulk.filters().unwrap().render(),
        "sort=citationCount%3Adesc&year=2020"
    );
}

#[test]
fn test_search_params_rejects_bad_input() {
    assert!(matches!(
        SearchPaperParams::new().limit(101).filters(),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        SearchPaperParams::new()
            .publication_date_or_year("2020/01")
            .filters(),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(SearchPaperParams::new()
        .min_citation_count(0)
        .filters()
        .unwrap()
        .is_empty());
}

// ============================================================================
// Async Client Tests
// ============================================================================

#[tokio::test]
async fn test_get_paper() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/CorpusId:215416146"))
        .and(query_param("fields", "title,year"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paperId": "5c5751d45e298cea054f32b392c12c61027d2fe7",
            "title": "Construction of the Literature Graph in Semantic Scholar",
            "year": 2018
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let paper = client(&mock_server)
        .get_paper("CorpusId:215416146", Some(&["title", "year"][..]))
        .await
        .unwrap();

    assert_eq!(paper.year, Some(2018));
    assert_eq!(
        paper.title.as_deref(),
        Some("Construction of the Literature Graph in Semantic Scholar")
    );
}

#[tokio::test]
async fn test_get_paper_default_projection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "paperId": "abc" })))
        .mount(&mock_server)
        .await;

    client(&mock_server).get_paper("abc", None).await.unwrap();
    assert_eq!(
        received_query(&mock_server, 0).await,
        format!("fields={}", Paper::FIELDS.join(","))
    );
}

#[tokio::test]
async fn test_get_paper_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Paper with id nope not found" })),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).get_paper("nope", None).await.unwrap_err();
    match err {
        Error::NotFound { message } => assert_eq!(message, "Paper with id nope not found"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_papers_with_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graph/v1/paper/batch"))
        .and(body_json(json!({ "ids": ["a", "ARXIV:1706.03762", "b"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "paperId": "a" },
            { "paperId": "c", "externalIds": { "ArXiv": "1706.03762" } },
            null
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ids = vec!["a".to_string(), "ARXIV:1706.03762".to_string(), "b".to_string()];
    let (papers, not_found) = client(&mock_server)
        .get_papers_with_not_found(&ids, None)
        .await
        .unwrap();

    assert_eq!(papers.len(), 2);
    assert_eq!(not_found, vec!["b".to_string()]);
}

#[tokio::test]
async fn test_batch_limits_checked_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let empty: [&str; 0] = [];
    assert!(matches!(
        client.get_papers(&empty, None).await,
        Err(Error::InvalidArgument { .. })
    ));

    let too_many: Vec<String> = (0..1001).map(|i| i.to_string()).collect();
    assert!(matches!(
        client.get_authors(&too_many, None).await,
        Err(Error::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn test_listing_limits_checked_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert!(client.get_paper_authors("abc", None, 0).await.is_err());
    assert!(client.get_paper_citations("abc", None, 1001).await.is_err());
    assert!(client.search_author("turing", None, 1001).await.is_err());
    assert!(client
        .get_recommended_papers("abc", None, 501, PoolFrom::Recent)
        .await
        .is_err());
    assert!(client
        .search_paper("covid", &SearchPaperParams::new().limit(0))
        .await
        .is_err());
}

#[tokio::test]
async fn test_search_paper_relevance() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("query", "covid vaccination"))
        .and(query_param("year", "2020"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "offset": 0,
            "data": [{ "paperId": "p0" }, { "paperId": "p1" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = SearchPaperParams::new().year("2020").fields(["title"]).limit(10);
    let mut results = client(&mock_server)
        .search_paper("covid vaccination", &params)
        .await
        .unwrap();

    assert_eq!(results.total(), 2);
    assert_eq!(results.max_results(), 1_000);
    let papers: Vec<_> = results.stream().collect().await;
    assert_eq!(papers.len(), 2);

    assert_eq!(
        received_query(&mock_server, 0).await,
        "query=covid+vaccination&year=2020&fields=title&offset=0&limit=10"
    );
}

#[tokio::test]
async fn test_search_paper_bulk_follows_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search/bulk"))
        .and(query_param("token", "NEXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "data": [{ "paperId": "p2" }]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search/bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "token": "NEXT",
            "data": [{ "paperId": "p0" }, { "paperId": "p1" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = SearchPaperParams::new().bulk(true).sort("paperId:asc");
    let mut results = client(&mock_server)
        .search_paper("genomics", &params)
        .await
        .unwrap();

    let ids: Vec<String> = results
        .stream()
        .map(|paper| paper.unwrap().paper_id.unwrap())
        .collect()
        .await;
    assert_eq!(ids, vec!["p0", "p1", "p2"]);
    assert!(received_query(&mock_server, 0)
        .await
        .starts_with("query=genomics&sort=paperId%3Aasc&fields="));
}

#[tokio::test]
async fn test_match_paper_title() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search/match"))
        .and(query_param("query", "attention is all you need"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "paperId": "204e30", "title": "Attention is All you Need", "matchScore": 181.2 }]
        })))
        .mount(&mock_server)
        .await;

    let paper = client(&mock_server)
        .match_paper_title("attention is all you need", None)
        .await
        .unwrap();
    assert_eq!(paper.paper_id.as_deref(), Some("204e30"));
}

#[tokio::test]
async fn test_match_paper_title_without_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search/match"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Title match not found" })),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .match_paper_title("zzzz", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { ref message } if message == "Title match not found"));
}

#[tokio::test]
async fn test_get_paper_citations_paginates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/abc/citations"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0,
            "next": 2,
            "data": [
                { "isInfluential": true, "citingPaper": { "paperId": "c0" } },
                { "isInfluential": false, "citingPaper": { "paperId": "c1" } }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/abc/citations"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 2,
            "data": [{ "citingPaper": { "paperId": "c2" } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut citations = client(&mock_server)
        .get_paper_citations("abc", None, 2)
        .await
        .unwrap();

    let all: Vec<_> = citations.stream().collect().await;
    assert_eq!(all.len(), 3);
    assert_eq!(
        citations[2].paper().and_then(|p| p.paper_id.as_deref()),
        Some("c2")
    );
    assert!(received_query(&mock_server, 0)
        .await
        .starts_with("fields=contexts,intents,contextsWithIntent,isInfluential,"));
}

#[tokio::test]
async fn test_get_author_and_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/1741101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorId": "1741101",
            "name": "Oren Etzioni"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graph/v1/author/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "authorId": "1741101", "name": "Oren Etzioni" },
            null
        ])))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let author = client.get_author("1741101", None).await.unwrap();
    assert_eq!(author.name.as_deref(), Some("Oren Etzioni"));

    let (authors, not_found) = client
        .get_authors_with_not_found(&["1741101", "0000"], None)
        .await
        .unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(not_found, vec!["0000".to_string()]);
}

#[tokio::test]
async fn test_recommendations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recommendations/v1/papers/forpaper/abc"))
        .and(query_param("limit", "10"))
        .and(query_param("from", "all-cs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendedPapers": [{ "paperId": "r0" }, { "paperId": "r1" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers/"))
        .and(body_json(json!({
            "positivePaperIds": ["p1", "p2"],
            "negativePaperIds": ["n1"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendedPapers": [{ "paperId": "r2" }]
        })))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let single = client
        .get_recommended_papers("abc", None, 10, PoolFrom::AllCs)
        .await
        .unwrap();
    assert_eq!(single.len(), 2);

    let lists = client
        .get_recommended_papers_from_lists(&["p1", "p2"], &["n1"], None, 100)
        .await
        .unwrap();
    assert_eq!(lists[0].paper_id.as_deref(), Some("r2"));
}

#[tokio::test]
async fn test_autocomplete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/autocomplete"))
        .and(query_param("query", "semantic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{ "id": "649def34", "title": "Semantic Scholar", "authorsYear": "Ammar et al., 2018" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/autocomplete"))
        .and(query_param("query", "zzz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let suggestions = client.get_autocomplete("semantic").await.unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].authors_year.as_deref(), Some("Ammar et al., 2018"));

    assert!(client.get_autocomplete("zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_datasets_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/datasets/v1/release/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["2023-10-31", "2023-11-07"])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/v1/release/2023-11-07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "release_id": "2023-11-07",
            "README": "readme",
            "datasets": [{ "name": "papers" }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/v1/release/2023-11-07/dataset/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "papers",
            "files": ["https://s3/papers-0.jsonl.gz"]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/v1/diffs/2023-10-31/to/2023-11-07/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dataset": "papers",
            "start_release": "2023-10-31",
            "end_release": "2023-11-07",
            "diffs": [{ "from_release": "2023-10-31", "to_release": "2023-11-07", "update_files": [], "delete_files": [] }]
        })))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert_eq!(
        client.get_available_releases().await.unwrap(),
        vec!["2023-10-31", "2023-11-07"]
    );

    let release = client.get_release("2023-11-07").await.unwrap();
    assert_eq!(release.datasets.unwrap()[0].name.as_deref(), Some("papers"));

    let dataset = client
        .get_dataset_download_links("2023-11-07", "papers")
        .await
        .unwrap();
    assert_eq!(dataset.files.unwrap().len(), 1);

    let diff = client
        .get_dataset_diffs("papers", "2023-10-31", "2023-11-07")
        .await
        .unwrap();
    assert_eq!(diff.diffs.unwrap().len(), 1);
}

#[test]
fn test_client_rejects_invalid_config() {
    let config = ClientConfig::builder().api_url("not a url").build();
    assert!(AsyncSemanticScholar::with_config(config).is_err());
}

// ============================================================================
// Blocking Client Tests
// ============================================================================

#[test]
fn test_blocking_client() {
    let server_runtime = tokio::runtime::Runtime::new().unwrap();
    let mock_server = server_runtime.block_on(MockServer::start());

    server_runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/graph/v1/author/search"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 3,
                "offset": 0,
                "next": 2,
                "data": [{ "authorId": "a0" }, { "authorId": "a1" }]
            })))
            .mount(&mock_server),
    );
    server_runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/graph/v1/author/search"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 3,
                "offset": 2,
                "data": [{ "authorId": "a2" }]
            })))
            .mount(&mock_server),
    );
    server_runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/graph/v1/paper/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "paperId": "abc" })))
            .mount(&mock_server),
    );

    let client = SemanticScholar::with_config(config(&mock_server)).unwrap();

    let paper = client.get_paper("abc", None).unwrap();
    assert_eq!(paper.paper_id.as_deref(), Some("abc"));

    let mut authors = client.search_author("turing", None, 2).unwrap();
    assert_eq!(authors.total(), 3);
    let ids: Vec<String> = authors
        .iter()
        .map(|author| author.unwrap().author_id.unwrap())
        .collect();
    assert_eq!(ids, vec!["a0", "a1", "a2"]);
}
