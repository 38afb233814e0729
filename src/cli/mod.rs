//! CLI module
//!
//! Command-line interface driving the async client.
//!
//! # Commands
//!
//! - `paper` / `papers` - Look up papers by id
//! - `author` / `authors` - Look up authors by id
//! - `search-paper` - Relevance or bulk paper search, or title match
//! - `search-author` - Author search
//! - `citations` / `references` - Citation graph of a paper
//! - `paper-authors` / `author-papers` - Authorship listings
//! - `recommend` - Paper recommendations
//! - `autocomplete` - Title suggestions
//! - `releases` / `release` / `dataset` / `diffs` - Datasets API

mod commands;
mod runner;

pub use commands::{Cli, Commands, FieldsArg, OutputFormat, PagingArgs};
pub use runner::Runner;
