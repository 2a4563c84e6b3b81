// SPDX-License-Identifier: MIT OR Apache-2.0

//! Indexer module - handles file scanning, indexing, and watching

pub mod scanner;
pub mod status;
pub mod watch;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};
use tree_sitter::Parser;

use crate::cli::OutputFormat;
use crate::parser::chunks::{self, Chunk};
use crate::parser::symbols::{Symbol, SymbolExtractor};
use ciq::config::Config;
use ciq::output::print_json;
use ciq::store::{ChunkRow, FileRecord, Store, SymbolRow};

use scanner::FileScanner;

/// Counters for one index build.
#[derive(Debug, Default, Serialize)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub files_removed: usize,
    pub parse_failures: usize,
    pub symbols: usize,
    pub chunks: usize,
    pub elapsed_ms: u64,
}

/// Builds and refreshes the on-disk index for one project root.
pub struct IndexBuilder {
    root: PathBuf,
    exclude_patterns: Vec<String>,
    show_progress: bool,
}

struct PendingFile {
    path: String,
    hash: String,
    content: String,
    language: Option<String>,
}

struct ParsedFile {
    path: String,
    hash: String,
    language: Option<String>,
    symbols: Vec<SymbolRow>,
    chunks: Vec<ChunkRow>,
    parse_failed: bool,
}

impl IndexBuilder {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .with_context(|| format!("resolve project root {}", root.as_ref().display()))?;
        let config = Config::load_for_dir(&root);
        Ok(Self {
            root,
            exclude_patterns: config.exclude_patterns,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Build or refresh the index. Unchanged files are skipped unless
    /// `force` is set; files no longer on disk are removed.
    pub fn build(&self, force: bool) -> Result<IndexStats> {
        let started = Instant::now();

        let scanner = FileScanner::with_excludes(&self.root, self.exclude_patterns.clone());
        let scanned = scanner.scan()?;

        let mut store = Store::open(&self.root)?;
        let known = store.file_hashes()?;

        let mut stats = IndexStats::default();
        let mut seen = HashSet::with_capacity(scanned.len());
        let mut pending = Vec::new();

        for file in scanned {
            let Some(rel) = relative_path(&self.root, &file.path) else {
                continue;
            };
            let hash = blake3::hash(file.content.as_bytes()).to_hex().to_string();
            seen.insert(rel.clone());

            if !force && known.get(&rel) == Some(&hash) {
                stats.files_skipped += 1;
                continue;
            }
            pending.push(PendingFile {
                path: rel,
                hash,
                content: file.content,
                language: file.language,
            });
        }

        let stale: Vec<String> = known
            .keys()
            .filter(|path| !seen.contains(*path))
            .cloned()
            .collect();

        let bar = self.progress_bar(pending.len())?;
        let extractor = SymbolExtractor::new();
        let parsed: Vec<ParsedFile> = pending
            .par_iter()
            .progress_with(bar.clone())
            .map_init(HashMap::new, |cache, file| {
                parse_file(&extractor, file, cache)
            })
            .collect();
        bar.finish_and_clear();

        // SQLite writes stay on one thread; parsing is the expensive part.
        for file in parsed {
            let record = FileRecord {
                path: file.path.clone(),
                hash: file.hash,
                language: file.language,
            };
            store
                .replace_file(&record, &file.symbols, &file.chunks)
                .with_context(|| format!("write {} to index", file.path))?;

            stats.files_indexed += 1;
            stats.symbols += file.symbols.len();
            stats.chunks += file.chunks.len();
            if file.parse_failed {
                stats.parse_failures += 1;
            }
        }

        if !stale.is_empty() {
            stats.files_removed = store.remove_files(&stale)?;
        }

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(
            indexed = stats.files_indexed,
            skipped = stats.files_skipped,
            removed = stats.files_removed,
            "index build complete"
        );
        Ok(stats)
    }

    fn progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.show_progress || len == 0 {
            return Ok(ProgressBar::hidden());
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files")?
                .progress_chars("#>-"),
        );
        Ok(bar)
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

fn parse_file(
    extractor: &SymbolExtractor,
    file: &PendingFile,
    cache: &mut HashMap<String, Parser>,
) -> ParsedFile {
    let mut parse_failed = false;

    let symbols = match &file.language {
        Some(language) => match extractor.extract_with_cache(&file.content, language, cache) {
            Ok(symbols) => symbols,
            Err(error) => {
                warn!(path = %file.path, %error, "symbol extraction failed, indexing as plain text");
                parse_failed = true;
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let chunks = if symbols.is_empty() {
        chunks::window_chunks(&file.content)
    } else {
        chunks::chunks_for_symbols(&file.content, &symbols)
    };

    ParsedFile {
        path: file.path.clone(),
        hash: file.hash.clone(),
        language: file.language.clone(),
        symbols: symbols.iter().map(symbol_row).collect(),
        chunks: chunks.into_iter().map(chunk_row).collect(),
        parse_failed,
    }
}

fn symbol_row(symbol: &Symbol) -> SymbolRow {
    SymbolRow {
        name: symbol.name.clone(),
        kind: symbol.kind.to_string(),
        line: symbol.line,
        column: symbol.column,
        end_line: Some(symbol.end_line),
    }
}

fn chunk_row(chunk: Chunk) -> ChunkRow {
    ChunkRow {
        content: chunk.content,
        start_line: chunk.start_line,
        end_line: chunk.end_line,
        kind: chunk.kind,
        symbol: chunk.symbol,
    }
}

/// Run the index command
pub fn run(path: Option<&str>, force: bool, format: OutputFormat, compact: bool) -> Result<()> {
    let root = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let builder = IndexBuilder::new(&root)?.with_progress(format == OutputFormat::Text);
    let stats = builder.build(force)?;

    match format {
        OutputFormat::Json => print_json(&stats, compact)?,
        OutputFormat::Text => {
            println!(
                "{} Indexed {} files in {}ms",
                "✓".green(),
                stats.files_indexed,
                stats.elapsed_ms
            );
            println!("  {} symbols, {} chunks", stats.symbols, stats.chunks);
            if stats.files_skipped > 0 {
                println!("  {} unchanged files skipped", stats.files_skipped);
            }
            if stats.files_removed > 0 {
                println!("  {} stale files removed", stats.files_removed);
            }
            if stats.parse_failures > 0 {
                println!(
                    "  {} files indexed as plain text after parse errors",
                    stats.parse_failures
                );
            }
        }
    }
    Ok(())
}
