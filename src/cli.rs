// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use ciq::classify::Intent;

/// ciq - Local code intelligence search
///
/// Indexes symbols and text chunks locally, classifies each query as a
/// symbol lookup, natural-language search, or both, and routes it to the
/// right backend.
#[derive(Parser, Debug)]
#[command(name = "ciq")]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Quickstart:\n  ciq index\n  ciq s parseConfig\n  ciq s \"how does token refresh work\"\n  ciq classify \"error AND handler\""
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Search mode override; the default is automatic routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliSearchMode {
    /// Exact symbol lookup only
    Symbol,
    /// Full-text search only
    Natural,
    /// Query both backends and merge
    Hybrid,
}

impl From<CliSearchMode> for Intent {
    fn from(mode: CliSearchMode) -> Self {
        match mode {
            CliSearchMode::Symbol => Intent::Symbol,
            CliSearchMode::Natural => Intent::Natural,
            CliSearchMode::Hybrid => Intent::Hybrid,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the index, routing by query intent
    #[command(
        visible_aliases = ["s", "q"],
        after_help = "Examples:\n  ciq s parseConfig\n  ciq s \"session token refresh\" -m 5\n  ciq search \"retry\" -M natural"
    )]
    Search {
        /// Search query (symbol name or natural language)
        query: String,

        /// Project path to search in (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Maximum number of results
        #[arg(short = 'm', long = "limit", visible_alias = "max-results")]
        limit: Option<usize>,

        /// Force a search mode instead of automatic routing
        #[arg(short = 'M', long, value_enum)]
        mode: Option<CliSearchMode>,

        /// Show how the query was classified alongside results
        #[arg(short, long)]
        verbose: bool,
    },

    /// Look up symbols by name prefix
    #[command(visible_aliases = ["sym", "sy"])]
    Symbols {
        /// Symbol name or prefix
        name: String,

        /// Filter by symbol kind (function, class, method, ...)
        #[arg(short = 'T', long = "kind")]
        kind: Option<String>,

        /// Project path to search in (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Maximum number of results
        #[arg(short = 'm', long = "limit", visible_alias = "max-results")]
        limit: Option<usize>,
    },

    /// Show how a query would be classified, without searching
    #[command(visible_aliases = ["cl"])]
    Classify {
        /// Query to classify
        query: String,
    },

    /// Build or rebuild the search index
    #[command(visible_aliases = ["ix", "i"])]
    Index {
        /// Path to index (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Force full reindex
        #[arg(short, long)]
        force: bool,
    },

    /// Show index location, counts and freshness
    #[command(visible_aliases = ["st"])]
    Status {
        /// Project path (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Watch for file changes and update index
    #[command(visible_aliases = ["wt", "w"])]
    Watch {
        /// Path to watch (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
