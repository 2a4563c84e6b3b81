//! Error types with helpful suggestions
//!
//! Search-pipeline failures are typed so callers can tell an invalid query
//! from a backend fault, and CLI-facing errors carry actionable suggestions.

use std::fmt;

use thiserror::Error;

/// Which retrieval backend produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Symbols,
    FullText,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Symbols => write!(f, "symbol store"),
            BackendKind::FullText => write!(f, "full-text index"),
        }
    }
}

/// Failures surfaced by the search orchestrator.
///
/// The pipeline fails closed: the first backend error aborts the whole
/// search rather than returning a partial result set.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("{backend} query failed: {source}")]
    Backend {
        backend: BackendKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("search timed out after {elapsed_ms} ms (budget {budget_ms} ms)")]
    Timeout { elapsed_ms: u64, budget_ms: u64 },
}

impl SearchError {
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        SearchError::InvalidQuery {
            reason: reason.into(),
        }
    }

    pub fn backend(backend: BackendKind, source: anyhow::Error) -> Self {
        SearchError::Backend { backend, source }
    }
}

/// Error indicating the search index was not found
#[derive(Debug)]
pub struct IndexNotFoundError {
    pub index_path: String,
}

impl fmt::Display for IndexNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index not found at '{}'\n\n\
             Suggestion: Run 'ciq index' to build the index first.\n\
             Example: ciq index\n\
             Or with a specific path: ciq index -p /path/to/project",
            self.index_path
        )
    }
}

impl std::error::Error for IndexNotFoundError {}
