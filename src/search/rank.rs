// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rank normalization and result merging

use std::cmp::Ordering;
use std::collections::HashSet;

use super::SearchResult;

/// Maps one batch of raw backend ranks onto comparable [0.0, 1.0] scores.
pub trait RankNormalizer {
    fn normalize(&self, ranks: &[f64]) -> Vec<f64>;
}

/// Min-max normalization over bm25 rank magnitudes.
///
/// FTS5's bm25() returns values at or below zero, more negative meaning more
/// relevant. Within a batch the largest magnitude maps to 1.0 and the
/// smallest to 0.0. A batch of identical ranks maps to all 1.0 so a lone
/// strong match is not punished.
pub struct Bm25MinMax;

impl RankNormalizer for Bm25MinMax {
    fn normalize(&self, ranks: &[f64]) -> Vec<f64> {
        if ranks.is_empty() {
            return Vec::new();
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for rank in ranks {
            let magnitude = rank.abs();
            min = min.min(magnitude);
            max = max.max(magnitude);
        }
        if max == min {
            return vec![1.0; ranks.len()];
        }
        let span = max - min;
        ranks.iter().map(|rank| (rank.abs() - min) / span).collect()
    }
}

/// Merge the symbol and chunk batches into the final result list.
///
/// Order matters: symbol results come first, so when a symbol and a chunk
/// share a (path, line) location the symbol wins the dedup. The sort is
/// stable, preserving backend order among equal scores. Returns the kept
/// results and the deduplicated count before truncation.
pub(crate) fn merge_results(
    symbols: Vec<SearchResult>,
    chunks: Vec<SearchResult>,
    limit: usize,
) -> (Vec<SearchResult>, usize) {
    let mut merged: Vec<SearchResult> = Vec::with_capacity(symbols.len() + chunks.len());
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    for result in symbols.into_iter().chain(chunks) {
        if seen.insert((result.path.clone(), result.line)) {
            merged.push(result);
        }
    }
    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    let total = merged.len();
    merged.truncate(limit);
    (merged, total)
}
