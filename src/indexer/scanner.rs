// SPDX-License-Identifier: MIT OR Apache-2.0

//! File scanner using the ignore crate (same as ripgrep)

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use ciq::store::INDEX_DIR;

const INDEXABLE_EXTENSIONS: &[&str] = &[
    "rs", "ts", "tsx", "js", "jsx", "py", "go", "java", "c", "h", "cpp", "cc", "hpp", "md", "txt",
    "json", "yaml", "yml", "toml",
];

/// Scanned file with content
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub content: String,
    pub language: Option<String>,
}

/// File scanner that respects .gitignore and custom excludes
pub struct FileScanner {
    root: PathBuf,
    exclude_patterns: Vec<String>,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Create scanner with exclude patterns
    pub fn with_excludes(root: impl AsRef<Path>, excludes: Vec<String>) -> Self {
        let mut scanner = Self::new(root);
        scanner.exclude_patterns = excludes;
        scanner
    }

    /// Scan all indexable files under the root in parallel
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        let (tx, rx) = mpsc::channel();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| {
                        name != INDEX_DIR && name != ".git" && name != ".hg" && name != ".svn"
                    })
                    .unwrap_or(true)
            })
            .build_parallel();

        let exclude_patterns = self.exclude_patterns.clone();

        walker.run(|| {
            let tx = tx.clone();
            let exclude_patterns = exclude_patterns.clone();

            Box::new(move |entry| {
                if let Ok(entry) = entry {
                    let path = entry.path();

                    if is_excluded(path, &exclude_patterns) {
                        return ignore::WalkState::Continue;
                    }

                    if path.is_file() {
                        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                            if is_indexable_extension(ext) {
                                // Skips binary or non-UTF-8 files.
                                if let Ok(content) = std::fs::read_to_string(path) {
                                    let _ = tx.send(ScannedFile {
                                        path: path.to_path_buf(),
                                        content,
                                        language: detect_language(ext),
                                    });
                                }
                            }
                        }
                    }
                }
                ignore::WalkState::Continue
            })
        });

        drop(tx);
        Ok(rx.into_iter().collect())
    }
}

fn is_excluded(path: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| path_str.contains(pattern.as_str()))
}

/// True when a file extension is included in indexing/scanning.
pub fn is_indexable_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    INDEXABLE_EXTENSIONS
        .iter()
        .any(|candidate| *candidate == lower.as_str())
}

/// Detect the tree-sitter language for a file extension. `None` means the
/// file is indexed as plain text.
pub fn detect_language(ext: &str) -> Option<String> {
    match ext.to_ascii_lowercase().as_str() {
        "rs" => Some("rust".into()),
        "ts" | "tsx" => Some("typescript".into()),
        "js" | "jsx" => Some("javascript".into()),
        "py" => Some("python".into()),
        "go" => Some("go".into()),
        "java" => Some("java".into()),
        "c" | "h" => Some("c".into()),
        "cpp" | "cc" | "hpp" => Some("cpp".into()),
        _ => None,
    }
}
