// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symbol-table lookups

use anyhow::Result;
use rusqlite::params;

use crate::search::{SymbolHit, SymbolSource};

use super::Store;

const EXACT_SQL: &str = "\
SELECT s.name, s.kind, f.path, s.line, s.col
FROM symbols s
JOIN files f ON f.id = s.file_id
WHERE s.name = ?1
ORDER BY f.path, s.line";

const PREFIX_SQL: &str = "\
SELECT s.name, s.kind, f.path, s.line, s.col
FROM symbols s
JOIN files f ON f.id = s.file_id
WHERE s.name LIKE ?1 ESCAPE '\\' AND (?2 IS NULL OR s.kind = ?2)
ORDER BY s.name, f.path, s.line
LIMIT ?3";

impl Store {
    /// All symbols with exactly this name, ordered by path then line.
    pub fn symbols_named(&self, name: &str) -> Result<Vec<SymbolHit>> {
        let mut stmt = self.conn.prepare_cached(EXACT_SQL)?;
        let rows = stmt.query_map(params![name], symbol_hit_from_row)?;
        let mut hits = Vec::new();
        for row in rows {
            hits.push(row?);
        }
        Ok(hits)
    }

    /// Prefix lookup with an optional kind filter. LIKE gives ASCII
    /// case-insensitive matching, which is what interactive lookups want.
    pub fn symbols_with_prefix(
        &self,
        prefix: &str,
        kind: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SymbolHit>> {
        let pattern = format!("{}%", escape_like(prefix));
        let mut stmt = self.conn.prepare_cached(PREFIX_SQL)?;
        let rows = stmt.query_map(params![pattern, kind, limit as i64], symbol_hit_from_row)?;
        let mut hits = Vec::new();
        for row in rows {
            hits.push(row?);
        }
        Ok(hits)
    }
}

impl SymbolSource for Store {
    fn find_exact(&self, name: &str) -> Result<Vec<SymbolHit>> {
        self.symbols_named(name)
    }
}

fn symbol_hit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SymbolHit> {
    Ok(SymbolHit {
        name: row.get(0)?,
        kind: row.get(1)?,
        path: row.get(2)?,
        line: row.get::<_, i64>(3)? as usize,
        column: row.get::<_, i64>(4)? as usize,
    })
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
