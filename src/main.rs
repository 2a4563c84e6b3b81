//! ciq - Local code intelligence search
//!
//! Indexes symbols (tree-sitter) and text chunks (SQLite FTS5) locally,
//! classifies each query's intent, and routes it to the matching backend.

mod cli;
mod indexer;
mod parser;
mod query;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, OutputFormat};

fn main() -> Result<()> {
    // RUST_LOG drives verbosity; logs go to stderr so JSON stdout stays
    // machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;
    let compact = cli.compact;

    match cli.command {
        Commands::Search {
            query,
            path,
            limit,
            mode,
            verbose,
        } => {
            query::search::run(
                &query,
                path.as_deref(),
                limit,
                mode,
                verbose,
                format,
                compact,
            )?;
        }
        Commands::Symbols {
            name,
            kind,
            path,
            limit,
        } => {
            query::symbols::run(
                &name,
                kind.as_deref(),
                path.as_deref(),
                limit,
                format,
                compact,
            )?;
        }
        Commands::Classify { query } => {
            query::classify::run(&query, format, compact)?;
        }
        Commands::Index { path, force } => {
            indexer::run(
                path.as_deref(),
                force,
                format.unwrap_or(OutputFormat::Text),
                compact,
            )?;
        }
        Commands::Status { path } => {
            indexer::status::run(
                path.as_deref(),
                format.unwrap_or(OutputFormat::Text),
                compact,
            )?;
        }
        Commands::Watch { path } => {
            indexer::watch::run(path.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ciq", &mut std::io::stdout());
        }
    }

    Ok(())
}
