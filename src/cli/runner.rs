//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FieldsArg, OutputFormat, PagingArgs};
use crate::client::{AsyncSemanticScholar, SearchPaperParams};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::PaginatedResults;
use crate::types::PoolFrom;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = AsyncSemanticScholar::with_config(self.client_config()?)?;

        match &self.cli.command {
            Commands::Paper { id, fields } => {
                let paper = client.get_paper(id, fields.projection().as_deref()).await?;
                self.output(&paper)
            }
            Commands::Papers {
                ids,
                fields,
                not_found,
            } => {
                let (papers, missing) = client
                    .get_papers_with_not_found(ids, fields.projection().as_deref())
                    .await?;
                self.output_all(&papers)?;
                if *not_found {
                    self.output(&json!({ "notFound": missing }))?;
                }
                Ok(())
            }
            Commands::Author { id, fields } => {
                let author = client.get_author(id, fields.projection().as_deref()).await?;
                self.output(&author)
            }
            Commands::Authors {
                ids,
                fields,
                not_found,
            } => {
                let (authors, missing) = client
                    .get_authors_with_not_found(ids, fields.projection().as_deref())
                    .await?;
                self.output_all(&authors)?;
                if *not_found {
                    self.output(&json!({ "notFound": missing }))?;
                }
                Ok(())
            }
            Commands::SearchPaper {
                query,
                year,
                publication_types,
                open_access_pdf,
                venue,
                fields_of_study,
                publication_date_or_year,
                min_citation_count,
                bulk,
                sort,
                match_title,
                fields,
                paging,
            } => {
                if *match_title {
                    let paper = client
                        .match_paper_title(query, fields.projection().as_deref())
                        .await?;
                    return self.output(&paper);
                }

                let mut params = SearchPaperParams::new()
                    .publication_types(publication_types)
                    .open_access_pdf(*open_access_pdf)
                    .venue(venue)
                    .fields_of_study(fields_of_study)
                    .fields(&fields.fields)
                    .limit(paging.limit)
                    .bulk(*bulk);
                params.year.clone_from(year);
                params.publication_date_or_year.clone_from(publication_date_or_year);
                params.min_citation_count = *min_citation_count;
                params.sort.clone_from(sort);

                let results = client.search_paper(query, &params).await?;
                self.stream_records(results, paging).await
            }
            Commands::SearchAuthor {
                query,
                fields,
                paging,
            } => {
                let results = client
                    .search_author(query, fields.projection().as_deref(), paging.limit)
                    .await?;
                self.stream_records(results, paging).await
            }
            Commands::Citations { id, fields, paging } => {
                let results = client
                    .get_paper_citations(id, fields.projection().as_deref(), paging.limit)
                    .await?;
                self.stream_records(results, paging).await
            }
            Commands::References { id, fields, paging } => {
                let results = client
                    .get_paper_references(id, fields.projection().as_deref(), paging.limit)
                    .await?;
                self.stream_records(results, paging).await
            }
            Commands::PaperAuthors { id, fields, paging } => {
                let results = client
                    .get_paper_authors(id, fields.projection().as_deref(), paging.limit)
                    .await?;
                self.stream_records(results, paging).await
            }
            Commands::AuthorPapers { id, fields, paging } => {
                let results = client
                    .get_author_papers(id, fields.projection().as_deref(), paging.limit)
                    .await?;
                self.stream_records(results, paging).await
            }
            Commands::Recommend {
                id,
                positive,
                negative,
                pool,
                limit,
                fields,
            } => {
                self.recommend(&client, id.as_deref(), positive, negative, pool, *limit, fields)
                    .await
            }
            Commands::Autocomplete { query } => {
                let suggestions = client.get_autocomplete(query).await?;
                self.output_all(&suggestions)
            }
            Commands::Releases => {
                let releases = client.get_available_releases().await?;
                self.output_all(&releases)
            }
            Commands::Release { id } => {
                let release = client.get_release(id).await?;
                self.output(&release)
            }
            Commands::Dataset { release, name } => {
                let dataset = client.get_dataset_download_links(release, name).await?;
                self.output(&dataset)
            }
            Commands::Diffs {
                dataset,
                start,
                end,
            } => {
                let diff = client.get_dataset_diffs(dataset, start, end).await?;
                self.output(&diff)
            }
        }
    }

    /// Build the client configuration: file, then environment, then flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let base = match self.cli.config {
            Some(ref path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        let mut config = base.apply_env();

        if let Some(ref key) = self.cli.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(ref url) = self.cli.api_url {
            config.api_url.clone_from(url);
        }
        if let Some(secs) = self.cli.timeout {
            config.timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| Error::config(format!("Invalid timeout: {e}")))?;
        }
        if self.cli.no_retry {
            config.retry = false;
        }
        if self.cli.debug {
            config.debug = true;
        }

        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::too_many_arguments)]
    async fn recommend(
        &self,
        client: &AsyncSemanticScholar,
        id: Option<&str>,
        positive: &[String],
        negative: &[String],
        pool: &str,
        limit: u64,
        fields: &FieldsArg,
    ) -> Result<()> {
        let projection = fields.projection();
        let papers = if positive.is_empty() {
            let id = id.ok_or_else(|| {
                Error::invalid_argument("A paper id or --positive examples are required")
            })?;
            let pool: PoolFrom = pool.parse()?;
            client
                .get_recommended_papers(id, projection.as_deref(), limit, pool)
                .await?
        } else {
            client
                .get_recommended_papers_from_lists(positive, negative, projection.as_deref(), limit)
                .await?
        };
        self.output_all(&papers)
    }

    /// Print records as pages arrive, stopping at `max_records`
    async fn stream_records<T>(
        &self,
        mut results: PaginatedResults<T>,
        paging: &PagingArgs,
    ) -> Result<()>
    where
        T: DeserializeOwned + Serialize + Clone,
    {
        let start = Instant::now();
        info!("{} matching records", results.total());

        let mut count = 0usize;
        let mut stream = std::pin::pin!(results.stream());
        loop {
            if paging.max_records.is_some_and(|max| count >= max) {
                break;
            }
            let Some(record) = stream.next().await else {
                break;
            };
            self.output(&record?)?;
            count += 1;
        }

        info!(
            "Emitted {} records in {:.2}s",
            count,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    fn output_all<T: Serialize>(&self, records: &[T]) -> Result<()> {
        for record in records {
            self.output(record)?;
        }
        Ok(())
    }

    /// Output one document
    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}
