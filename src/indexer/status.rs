// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index status reporting

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cli::OutputFormat;
use ciq::errors::IndexNotFoundError;
use ciq::output::print_json;
use ciq::store::{LanguageCount, Store};

#[derive(Debug, Serialize)]
pub struct IndexStatus {
    pub root: String,
    pub index_path: String,
    pub schema_version: i64,
    pub size_bytes: u64,
    pub files: usize,
    pub symbols: usize,
    pub chunks: usize,
    pub languages: Vec<LanguageCount>,
    pub last_indexed: Option<i64>,
}

/// Gather status for the index rooted at `root`.
pub fn collect(root: &Path) -> Result<IndexStatus> {
    let store = Store::open_existing(root)?;
    let stats = store.stats()?;
    let index_path = Store::index_path(root);
    let size_bytes = fs::metadata(&index_path).map(|m| m.len()).unwrap_or(0);

    Ok(IndexStatus {
        root: root.display().to_string(),
        index_path: index_path.display().to_string(),
        schema_version: store.schema_version()?,
        size_bytes,
        files: stats.files,
        symbols: stats.symbols,
        chunks: stats.chunks,
        languages: stats.languages,
        last_indexed: stats.last_indexed,
    })
}

/// Run the status command
pub fn run(path: Option<&str>, format: OutputFormat, compact: bool) -> Result<()> {
    let start = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let start = start.canonicalize().unwrap_or(start);
    let root = Store::find_index_root(&start).ok_or_else(|| IndexNotFoundError {
        index_path: Store::index_path(&start).display().to_string(),
    })?;

    let status = collect(&root)?;

    match format {
        OutputFormat::Json => print_json(&status, compact)?,
        OutputFormat::Text => render_text(&status),
    }
    Ok(())
}

fn render_text(status: &IndexStatus) {
    println!("{} Index: {}", "✓".green(), status.index_path);
    println!("  Schema version: {}", status.schema_version);
    println!("  Size: {}", human_bytes(status.size_bytes));
    println!("  Files: {}", status.files);
    println!("  Symbols: {}", status.symbols);
    println!("  Chunks: {}", status.chunks);
    if !status.languages.is_empty() {
        println!("  Languages:");
        for lang in &status.languages {
            println!("    {}: {} files", lang.language, lang.files);
        }
    }
    if let Some(ts) = status.last_indexed {
        println!("  Last indexed: {}", ago(ts));
    }
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn ago(timestamp: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let elapsed = (now - timestamp).max(0);

    match elapsed {
        0..=4 => "just now".to_string(),
        5..=59 => format!("{elapsed}s ago"),
        60..=3599 => format!("{}m ago", elapsed / 60),
        3600..=86_399 => format!("{}h ago", elapsed / 3600),
        _ => format!("{}d ago", elapsed / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::IndexBuilder;
    use tempfile::TempDir;

    #[test]
    fn collect_reports_counts_and_size() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("a.rs"), "pub fn alpha() {}\n").expect("write");
        fs::write(dir.path().join("notes.md"), "token refresh flow\n").expect("write");

        IndexBuilder::new(dir.path())
            .expect("builder")
            .with_progress(false)
            .build(false)
            .expect("build");

        let status = collect(dir.path()).expect("status");
        assert_eq!(status.files, 2);
        assert_eq!(status.schema_version, 1);
        assert!(status.size_bytes > 0);
        assert!(status.symbols >= 1);
        assert!(status.last_indexed.is_some());
        assert!(status.languages.iter().any(|l| l.language == "rust"));
        assert!(status.languages.iter().any(|l| l.language == "text"));
    }

    #[test]
    fn missing_index_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        assert!(collect(dir.path()).is_err());
    }

    #[test]
    fn byte_sizes_humanize() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(2048), "2.0 KB");
        assert_eq!(human_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn ago_buckets_by_magnitude() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_secs() as i64;
        assert_eq!(ago(now), "just now");
        assert_eq!(ago(now - 30), "30s ago");
        assert_eq!(ago(now - 120), "2m ago");
        assert_eq!(ago(now - 7200), "2h ago");
    }
}
