// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent-routed search over the symbol and full-text backends

use std::time::{Duration, Instant};

use tracing::debug;

use crate::classify::{Intent, IntentClassifier, QueryAnalysis};
use crate::errors::{BackendKind, SearchError};

use super::rank::{self, Bm25MinMax, RankNormalizer};
use super::{ChunkSource, SearchResponse, SearchResult, SymbolSource};

/// Result cap applied when the caller passes a limit of 0.
pub const DEFAULT_LIMIT: usize = 10;

/// Routes queries to the right backend for their classified intent and
/// assembles one merged, scored response.
///
/// Backends are borrowed trait objects in spirit: anything implementing the
/// source traits works, so tests drive the pipeline with in-memory fakes
/// while production wires both seams to the SQLite store.
pub struct SearchOrchestrator<'a, S, C> {
    symbols: &'a S,
    chunks: &'a C,
    classifier: IntentClassifier,
    normalizer: Box<dyn RankNormalizer>,
    budget: Option<Duration>,
}

impl<'a, S, C> SearchOrchestrator<'a, S, C>
where
    S: SymbolSource,
    C: ChunkSource,
{
    pub fn new(symbols: &'a S, chunks: &'a C, classifier: IntentClassifier) -> Self {
        SearchOrchestrator {
            symbols,
            chunks,
            classifier,
            normalizer: Box::new(Bm25MinMax),
            budget: None,
        }
    }

    /// Abort searches that run past this wall-clock budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Swap the rank normalization strategy.
    pub fn with_normalizer(mut self, normalizer: Box<dyn RankNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Classify a query without searching.
    pub fn classify(&self, query: &str) -> QueryAnalysis {
        self.classifier.classify(query)
    }

    /// Search with the classifier deciding the route.
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, SearchError> {
        self.search_with_intent(query, limit, None)
    }

    /// Search, optionally forcing the route. The analysis in the response
    /// always reports what the classifier decided on its own.
    pub fn search_with_intent(
        &self,
        query: &str,
        limit: usize,
        forced: Option<Intent>,
    ) -> Result<SearchResponse, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::invalid_query("query is empty"));
        }
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };

        let analysis = self.classifier.classify(query);
        let intent = forced.unwrap_or(analysis.intent);
        debug!(
            %intent,
            confidence = analysis.confidence,
            rule = analysis.rule,
            "dispatching query"
        );

        let started = Instant::now();

        // Symbol batch first so it wins the location dedup in the merge.
        let mut symbol_batch = match intent {
            Intent::Symbol | Intent::Hybrid => self.fetch_symbols(&analysis.normalized)?,
            Intent::Natural => Vec::new(),
        };
        symbol_batch.truncate(limit);
        self.check_budget(started)?;

        let chunk_batch = match intent {
            Intent::Natural | Intent::Hybrid => self.fetch_chunks(query, limit)?,
            Intent::Symbol => Vec::new(),
        };
        self.check_budget(started)?;

        let (results, total_results) = rank::merge_results(symbol_batch, chunk_batch, limit);

        Ok(SearchResponse {
            query: query.to_string(),
            analysis,
            results,
            total_results,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }

    fn fetch_symbols(&self, name: &str) -> Result<Vec<SearchResult>, SearchError> {
        let hits = self
            .symbols
            .find_exact(name)
            .map_err(|source| SearchError::backend(BackendKind::Symbols, source))?;
        Ok(hits.into_iter().map(SearchResult::from_symbol).collect())
    }

    fn fetch_chunks(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        // The query string passes through to the engine's boolean/phrase
        // syntax unmodified; malformed syntax surfaces as a backend error.
        let hits = self
            .chunks
            .search(query, limit)
            .map_err(|source| SearchError::backend(BackendKind::FullText, source))?;
        let ranks: Vec<f64> = hits.iter().map(|hit| hit.rank).collect();
        let scores = self.normalizer.normalize(&ranks);
        Ok(hits
            .into_iter()
            .zip(scores)
            .map(|(hit, score)| SearchResult::from_chunk(hit, score))
            .collect())
    }

    fn check_budget(&self, started: Instant) -> Result<(), SearchError> {
        let Some(budget) = self.budget else {
            return Ok(());
        };
        let elapsed = started.elapsed();
        if elapsed > budget {
            return Err(SearchError::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
                budget_ms: budget.as_millis() as u64,
            });
        }
        Ok(())
    }
}
