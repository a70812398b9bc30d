//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use beatsaver_core::{DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, SearchSortOrder};
use beatsaver_core::api::LatestSortOrder;

/// Look up, search, and download BeatSaver maps.
///
/// Downloaded maps are extracted into one folder per map under the output
/// folder, ready for SongCore to pick up.
#[derive(Parser, Debug)]
#[command(name = "beatsaver")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Folder maps are extracted under (defaults to the Quest SongCore folder)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<PathBuf>,

    /// REST API base URL
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, global = true, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Maximum attempts per archive for retryable failures (0-10, 0 means a single attempt)
    #[arg(short = 'r', long, global = true, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a map by key
    Map {
        /// Map key, e.g. 1a2b
        key: String,
    },

    /// Show a map by version hash
    Hash {
        /// Version hash
        hash: String,
    },

    /// Show a user by numeric id or name
    User {
        /// Numeric user id or user name
        user: String,
    },

    /// Search maps
    Search(SearchArgs),

    /// List the newest maps
    Latest(LatestArgs),

    /// Download maps by key into the output folder
    Download {
        /// Map keys to download
        #[arg(required = true)]
        keys: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known search tags
    Tags,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: Option<String>,

    /// Result page, starting at 0
    #[arg(short = 'p', long, default_value_t = 0)]
    pub page: u32,

    /// Result ordering
    #[arg(short = 's', long, value_enum, default_value_t = SearchSort::Latest)]
    pub sort: SearchSort,

    /// Only maps carrying this tag (repeatable)
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Skip maps carrying this tag (repeatable)
    #[arg(long = "exclude-tag")]
    pub exclude_tags: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct LatestArgs {
    /// Maps per page (1-100)
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(i32).range(1..=100))]
    pub page_size: i32,

    /// Listing order
    #[arg(short = 's', long, value_enum)]
    pub sort: Option<LatestSort>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    Latest,
    Relevance,
    Rating,
    Curated,
}

impl From<SearchSort> for SearchSortOrder {
    fn from(sort: SearchSort) -> Self {
        match sort {
            SearchSort::Latest => Self::Latest,
            SearchSort::Relevance => Self::Relevance,
            SearchSort::Rating => Self::Rating,
            SearchSort::Curated => Self::Curated,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestSort {
    FirstPublished,
    Updated,
    LastPublished,
    Created,
    Curated,
}

impl From<LatestSort> for LatestSortOrder {
    fn from(sort: LatestSort) -> Self {
        match sort {
            LatestSort::FirstPublished => Self::FirstPublished,
            LatestSort::Updated => Self::Updated,
            LatestSort::LastPublished => Self::LastPublished,
            LatestSort::Created => Self::Created,
            LatestSort::Curated => Self::Curated,
        }
    }
}
