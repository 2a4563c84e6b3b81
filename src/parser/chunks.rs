// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunk building: the searchable text regions behind full-text results

use crate::parser::symbols::Symbol;

/// Lines of surrounding context folded into a chunk's indexed text.
pub const CONTEXT_LINES: usize = 2;

/// Window size for files that yield no symbols (docs, configs, plain text).
pub const WINDOW_LINES: usize = 40;

/// A text region destined for the full-text index. `start_line` and
/// `end_line` bound the region itself; `content` may carry extra context
/// lines so searches match nearby words. `symbol` indexes into the symbol
/// slice the chunk was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub kind: String,
    pub symbol: Option<usize>,
}

/// Build one chunk per top-level symbol. Symbols enclosed by another
/// extracted symbol (methods inside a class) are folded into the outer
/// chunk's text rather than emitted on their own.
pub fn chunks_for_symbols(source: &str, symbols: &[Symbol]) -> Vec<Chunk> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    for (i, symbol) in symbols.iter().enumerate() {
        if !is_top_level(symbols, i) {
            continue;
        }

        let start = symbol.line.min(lines.len());
        let end = symbol.end_line.min(lines.len()).max(start);
        let ctx_start = start.saturating_sub(CONTEXT_LINES).max(1);
        let ctx_end = (end + CONTEXT_LINES).min(lines.len());

        let content = lines[ctx_start - 1..ctx_end].join("\n");
        if content.trim().is_empty() {
            continue;
        }

        chunks.push(Chunk {
            content,
            start_line: start,
            end_line: end,
            kind: symbol.kind.to_string(),
            symbol: Some(i),
        });
    }
    chunks
}

/// Fallback chunking for files without symbols: fixed line windows, skipping
/// windows that are entirely blank.
pub fn window_chunks(source: &str) -> Vec<Chunk> {
    let lines: Vec<&str> = source.lines().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < lines.len() {
        let end = (start + WINDOW_LINES).min(lines.len());
        let content = lines[start..end].join("\n");
        if !content.trim().is_empty() {
            chunks.push(Chunk {
                content,
                start_line: start + 1,
                end_line: end,
                kind: "text".to_string(),
                symbol: None,
            });
        }
        start = end;
    }
    chunks
}

fn is_top_level(symbols: &[Symbol], i: usize) -> bool {
    let inner = &symbols[i];
    !symbols.iter().enumerate().any(|(j, outer)| {
        j != i
            && outer.line <= inner.line
            && outer.end_line >= inner.end_line
            && (outer.line < inner.line || outer.end_line > inner.end_line)
    })
}
