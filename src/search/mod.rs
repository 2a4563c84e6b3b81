// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid search pipeline
//!
//! Defines the backend seams the orchestrator routes over and the result
//! model shared by the CLI and JSON output. Scoring lives in [`rank`],
//! routing in [`orchestrator`].

mod orchestrator;
mod rank;

pub use orchestrator::{SearchOrchestrator, DEFAULT_LIMIT};
pub use rank::{Bm25MinMax, RankNormalizer};

use serde::Serialize;

use crate::classify::QueryAnalysis;

/// Exact-name lookup against the symbol store.
pub trait SymbolSource {
    fn find_exact(&self, name: &str) -> anyhow::Result<Vec<SymbolHit>>;
}

/// Ranked full-text search over indexed chunks.
pub trait ChunkSource {
    fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<ChunkHit>>;
}

/// A symbol-store match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolHit {
    pub name: String,
    pub kind: String,
    pub path: String,
    pub line: usize,
    pub column: usize,
}

/// A full-text match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkHit {
    pub path: String,
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub kind: String,
    /// Raw bm25 rank from the engine; more negative means more relevant
    pub rank: f64,
}

/// Score every exact symbol match carries.
pub const SYMBOL_MATCH_SCORE: f64 = 1.0;

/// Kind-specific payload of a search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultOrigin {
    Symbol {
        name: String,
        symbol_kind: String,
        column: usize,
    },
    Chunk {
        content: String,
        start_line: usize,
        end_line: usize,
        chunk_kind: String,
        rank: f64,
    },
}

/// One merged search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub path: String,
    /// Primary line: the symbol's definition line, or the chunk's first line
    pub line: usize,
    /// Comparable relevance in [0.0, 1.0]
    pub score: f64,
    #[serde(flatten)]
    pub origin: ResultOrigin,
}

impl SearchResult {
    pub fn from_symbol(hit: SymbolHit) -> Self {
        SearchResult {
            path: hit.path,
            line: hit.line,
            score: SYMBOL_MATCH_SCORE,
            origin: ResultOrigin::Symbol {
                name: hit.name,
                symbol_kind: hit.kind,
                column: hit.column,
            },
        }
    }

    pub fn from_chunk(hit: ChunkHit, score: f64) -> Self {
        SearchResult {
            path: hit.path,
            line: hit.start_line,
            score,
            origin: ResultOrigin::Chunk {
                content: hit.content,
                start_line: hit.start_line,
                end_line: hit.end_line,
                chunk_kind: hit.kind,
                rank: hit.rank,
            },
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self.origin, ResultOrigin::Symbol { .. })
    }
}

/// Everything a search produced, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Classifier output, reported even when the intent was forced
    pub analysis: QueryAnalysis,
    pub results: Vec<SearchResult>,
    /// Deduplicated match count before the limit was applied
    pub total_results: usize,
    pub elapsed_ms: f64,
}
