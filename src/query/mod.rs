//! Query module - search, symbol lookup and classification commands

pub mod classify;
pub mod search;
pub mod symbols;

use std::path::PathBuf;

use crate::cli::OutputFormat;
use ciq::config::{Config, ConfigOutputFormat};
use ciq::errors::IndexNotFoundError;
use ciq::store::Store;

/// CLI format flag wins over config; text is the default.
pub(crate) fn resolve_format(cli: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if let Some(format) = cli {
        return format;
    }
    match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        Some(ConfigOutputFormat::Text) | None => OutputFormat::Text,
    }
}

/// Resolve the project root for a query command: the nearest ancestor of
/// `path` (or the current directory) that holds an index.
pub(crate) fn resolve_root(path: Option<&str>) -> anyhow::Result<PathBuf> {
    let start = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let start = start.canonicalize().unwrap_or(start);
    Store::find_index_root(&start).ok_or_else(|| {
        IndexNotFoundError {
            index_path: Store::index_path(&start).display().to_string(),
        }
        .into()
    })
}
