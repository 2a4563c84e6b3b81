// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-text chunk search

use anyhow::Result;
use rusqlite::params;

use crate::search::{ChunkHit, ChunkSource};

use super::Store;

// bm25() is only meaningful inside a MATCH query; lower means better, so
// ORDER BY rank puts the strongest hit first.
const SEARCH_SQL: &str = "\
SELECT f.path, c.content, c.start_line, c.end_line, c.kind, bm25(chunk_fts) AS rank
FROM chunk_fts
JOIN chunks c ON c.id = chunk_fts.rowid
JOIN files f ON f.id = c.file_id
WHERE chunk_fts MATCH ?1
ORDER BY rank
LIMIT ?2";

impl Store {
    /// Ranked full-text search over chunk contents. The query string is
    /// handed to FTS5 as-is, so its boolean/phrase syntax applies and
    /// malformed syntax comes back as an error.
    pub fn search_chunks(&self, query: &str, limit: usize) -> Result<Vec<ChunkHit>> {
        let mut stmt = self.conn.prepare_cached(SEARCH_SQL)?;
        let rows = stmt.query_map(params![query, limit as i64], |row| {
            Ok(ChunkHit {
                path: row.get(0)?,
                content: row.get(1)?,
                start_line: row.get::<_, i64>(2)? as usize,
                end_line: row.get::<_, i64>(3)? as usize,
                kind: row.get(4)?,
                rank: row.get(5)?,
            })
        })?;
        let mut hits = Vec::new();
        for row in rows {
            hits.push(row?);
        }
        Ok(hits)
    }
}

impl ChunkSource for Store {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<ChunkHit>> {
        self.search_chunks(query, limit)
    }
}
