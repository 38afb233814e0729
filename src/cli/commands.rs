//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Semantic Scholar command-line client
#[derive(Parser, Debug)]
#[command(name = "semanticscholar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides SEMANTIC_SCHOLAR_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API root URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Fail immediately on HTTP 429 instead of retrying
    #[arg(long, global = true)]
    pub no_retry: bool,

    /// Trace every request, including an equivalent curl command
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Projection shared by most commands
#[derive(Args, Debug, Clone, Default)]
pub struct FieldsArg {
    /// Fields to return (comma-separated, default depends on the endpoint)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,
}

/// Paging options of listing commands
#[derive(Args, Debug, Clone)]
pub struct PagingArgs {
    /// Page size
    #[arg(long, default_value = "100")]
    pub limit: u64,

    /// Stop after this many records
    #[arg(long)]
    pub max_records: Option<usize>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up one paper
    Paper {
        /// Paper id (S2 id, or prefixed: CorpusId:, DOI:, ARXIV:, PMID:, URL:, ...)
        id: String,

        #[command(flatten)]
        fields: FieldsArg,
    },

    /// Look up up to 500 papers at once
    Papers {
        /// Paper ids
        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        fields: FieldsArg,

        /// Also print the ids that were not found
        #[arg(long)]
        not_found: bool,
    },

    /// Look up one author
    Author {
        /// Author id
        id: String,

        #[command(flatten)]
        fields: FieldsArg,
    },

    /// Look up up to 1000 authors at once
    Authors {
        /// Author ids
        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        fields: FieldsArg,

        /// Also print the ids that were not found
        #[arg(long)]
        not_found: bool,
    },

    /// Search papers by keyword
    SearchPaper {
        /// Plain-text query
        query: String,

        /// Publication year or range (2019, 2016-2020, 2010-, -2015)
        #[arg(long)]
        year: Option<String>,

        /// Publication types (comma-separated)
        #[arg(long, value_delimiter = ',')]
        publication_types: Vec<String>,

        /// Only papers with a public PDF
        #[arg(long)]
        open_access_pdf: bool,

        /// Venues (comma-separated)
        #[arg(long, value_delimiter = ',')]
        venue: Vec<String>,

        /// Fields of study (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fields_of_study: Vec<String>,

        /// Date range <start>:<end> with YYYY, YYYY-MM or YYYY-MM-DD dates
        #[arg(long)]
        publication_date_or_year: Option<String>,

        /// Minimum citation count
        #[arg(long)]
        min_citation_count: Option<u64>,

        /// Bulk retrieval (up to 10,000,000 results, no relevance ranking)
        #[arg(long)]
        bulk: bool,

        /// Sort order for bulk retrieval, <field>:<asc|desc>
        #[arg(long)]
        sort: Option<String>,

        /// Print only the paper whose title best matches the query
        #[arg(long, conflicts_with = "bulk")]
        match_title: bool,

        #[command(flatten)]
        fields: FieldsArg,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Search authors by name
    SearchAuthor {
        /// Plain-text query
        query: String,

        #[command(flatten)]
        fields: FieldsArg,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Papers citing a paper
    Citations {
        /// Paper id
        id: String,

        #[command(flatten)]
        fields: FieldsArg,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Papers cited by a paper
    References {
        /// Paper id
        id: String,

        #[command(flatten)]
        fields: FieldsArg,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Authors of a paper
    PaperAuthors {
        /// Paper id
        id: String,

        #[command(flatten)]
        fields: FieldsArg,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Papers of an author
    AuthorPapers {
        /// Author id
        id: String,

        #[command(flatten)]
        fields: FieldsArg,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Recommended papers for one paper, or for positive/negative examples
    Recommend {
        /// Paper id (omit when using --positive)
        id: Option<String>,

        /// Positive example ids (comma-separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "id")]
        positive: Vec<String>,

        /// Negative example ids (comma-separated)
        #[arg(long, value_delimiter = ',', requires = "positive")]
        negative: Vec<String>,

        /// Pool to recommend from: recent or all-cs
        #[arg(long, default_value = "recent")]
        pool: String,

        /// Number of recommendations
        #[arg(long, default_value = "100")]
        limit: u64,

        #[command(flatten)]
        fields: FieldsArg,
    },

    /// Title suggestions for a partial query
    Autocomplete {
        /// Partial query
        query: String,
    },

    /// List dataset releases
    Releases,

    /// Show a dataset release
    Release {
        /// Release id or "latest"
        id: String,
    },

    /// Download links of a dataset
    Dataset {
        /// Release id or "latest"
        release: String,

        /// Dataset name (papers, authors, abstracts, ...)
        name: String,
    },

    /// Incremental updates of a dataset between two releases
    Diffs {
        /// Dataset name
        dataset: String,

        /// Release the local copy is at
        start: String,

        /// Release to update to ("latest" accepted)
        end: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

impl FieldsArg {
    /// Projection to request, `None` for the endpoint default
    pub fn projection(&self) -> Option<Vec<&str>> {
        if self.fields.is_empty() {
            None
        } else {
            Some(self.fields.iter().map(String::as_str).collect())
        }
    }
}
