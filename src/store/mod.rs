// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded SQLite index
//!
//! One database under `.ciq/index.db` backs both retrieval sides: the
//! `symbols` table answers exact and prefix name lookups, and the `chunks`
//! table paired with the external-content FTS5 table `chunk_fts` answers
//! ranked full-text queries. Triggers keep the FTS table in sync with
//! `chunks`, so writers only ever touch the base tables.

mod chunks;
mod symbols;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::errors::IndexNotFoundError;

/// Directory the index lives in, relative to the project root.
pub const INDEX_DIR: &str = ".ciq";
/// Database file name inside [`INDEX_DIR`].
pub const INDEX_FILE: &str = "index.db";

const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY,
    path TEXT NOT NULL UNIQUE,
    hash TEXT NOT NULL,
    language TEXT,
    indexed_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS symbols (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    line INTEGER NOT NULL,
    col INTEGER NOT NULL,
    end_line INTEGER
);
CREATE INDEX IF NOT EXISTS idx_symbols_name ON symbols(name);
CREATE INDEX IF NOT EXISTS idx_symbols_file ON symbols(file_id);

CREATE TABLE IF NOT EXISTS chunks (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    symbol_id INTEGER REFERENCES symbols(id) ON DELETE SET NULL,
    content TEXT NOT NULL,
    start_line INTEGER NOT NULL,
    end_line INTEGER NOT NULL,
    kind TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chunks_file ON chunks(file_id);

CREATE VIRTUAL TABLE IF NOT EXISTS chunk_fts USING fts5(
    content,
    content='chunks',
    content_rowid='id'
);

CREATE TRIGGER IF NOT EXISTS chunks_ai AFTER INSERT ON chunks BEGIN
    INSERT INTO chunk_fts(rowid, content) VALUES (new.id, new.content);
END;
CREATE TRIGGER IF NOT EXISTS chunks_ad AFTER DELETE ON chunks BEGIN
    INSERT INTO chunk_fts(chunk_fts, rowid, content) VALUES ('delete', old.id, old.content);
END;
CREATE TRIGGER IF NOT EXISTS chunks_au AFTER UPDATE ON chunks BEGIN
    INSERT INTO chunk_fts(chunk_fts, rowid, content) VALUES ('delete', old.id, old.content);
    INSERT INTO chunk_fts(rowid, content) VALUES (new.id, new.content);
END;
";

/// One indexed file's identity row.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the project root, '/'-separated
    pub path: String,
    /// blake3 hex digest of the file content
    pub hash: String,
    pub language: Option<String>,
}

/// A symbol row to be written alongside its file.
#[derive(Debug, Clone)]
pub struct SymbolRow {
    pub name: String,
    pub kind: String,
    pub line: usize,
    pub column: usize,
    pub end_line: Option<usize>,
}

/// A chunk row to be written alongside its file.
#[derive(Debug, Clone)]
pub struct ChunkRow {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub kind: String,
    /// Index into the symbol slice written in the same call, if the chunk
    /// covers a symbol
    pub symbol: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub files: usize,
}

/// Aggregate row counts for status output.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub files: usize,
    pub symbols: usize,
    pub chunks: usize,
    pub languages: Vec<LanguageCount>,
    /// Unix timestamp of the most recent file write, if any.
    pub last_indexed: Option<i64>,
}

/// Handle to the on-disk index.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the index under `root`, creating directory, database and schema
    /// as needed.
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(INDEX_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create index directory {}", dir.display()))?;
        let path = dir.join(INDEX_FILE);
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open index at {}", path.display()))?;
        Self::init(conn)
    }

    /// Open an index that must already exist. Query commands use this so a
    /// missing index yields a suggestion instead of an empty database.
    pub fn open_existing(root: &Path) -> Result<Self> {
        if !Self::exists(root) {
            return Err(IndexNotFoundError {
                index_path: Self::index_path(root).display().to_string(),
            }
            .into());
        }
        Self::open(root)
    }

    fn init(conn: Connection) -> Result<Self> {
        // WAL lets the watch loop write while searches read.
        let _journal: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            anyhow::bail!(
                "Index schema version {version} is newer than this build supports \
                 ({SCHEMA_VERSION}); upgrade ciq or delete the {INDEX_DIR} directory"
            );
        }
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!(version = SCHEMA_VERSION, "index schema ready");
        Ok(Store { conn })
    }

    pub fn index_path(root: &Path) -> PathBuf {
        root.join(INDEX_DIR).join(INDEX_FILE)
    }

    pub fn exists(root: &Path) -> bool {
        Self::index_path(root).is_file()
    }

    /// Walk from `start` up through its ancestors looking for an index.
    pub fn find_index_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| Self::exists(dir))
            .map(Path::to_path_buf)
    }

    pub fn schema_version(&self) -> Result<i64> {
        let version = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    /// Replace everything known about one file in a single transaction:
    /// upsert the file row, drop its old symbols and chunks, insert the new
    /// ones. Chunk symbol references are resolved against the symbol slice
    /// passed in the same call.
    pub fn replace_file(
        &mut self,
        file: &FileRecord,
        symbols: &[SymbolRow],
        chunks: &[ChunkRow],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO files (path, hash, language, indexed_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(path) DO UPDATE SET
                 hash = excluded.hash,
                 language = excluded.language,
                 indexed_at = excluded.indexed_at",
            params![file.path, file.hash, file.language, now_unix()],
        )?;
        let file_id: i64 = tx.query_row(
            "SELECT id FROM files WHERE path = ?1",
            params![file.path],
            |row| row.get(0),
        )?;

        // Children first, and explicitly, so the FTS sync triggers fire.
        tx.execute("DELETE FROM chunks WHERE file_id = ?1", params![file_id])?;
        tx.execute("DELETE FROM symbols WHERE file_id = ?1", params![file_id])?;

        let mut symbol_ids = Vec::with_capacity(symbols.len());
        {
            let mut insert = tx.prepare(
                "INSERT INTO symbols (file_id, name, kind, line, col, end_line)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for symbol in symbols {
                insert.execute(params![
                    file_id,
                    symbol.name,
                    symbol.kind,
                    symbol.line as i64,
                    symbol.column as i64,
                    symbol.end_line.map(|l| l as i64),
                ])?;
                symbol_ids.push(tx.last_insert_rowid());
            }

            let mut insert = tx.prepare(
                "INSERT INTO chunks (file_id, symbol_id, content, start_line, end_line, kind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for chunk in chunks {
                let symbol_id = chunk.symbol.and_then(|i| symbol_ids.get(i)).copied();
                insert.execute(params![
                    file_id,
                    symbol_id,
                    chunk.content,
                    chunk.start_line as i64,
                    chunk.end_line as i64,
                    chunk.kind,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Drop files (and their symbols/chunks) from the index. Returns how
    /// many file rows were removed.
    pub fn remove_files(&mut self, paths: &[String]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        {
            let mut delete_chunks = tx.prepare(
                "DELETE FROM chunks WHERE file_id = (SELECT id FROM files WHERE path = ?1)",
            )?;
            let mut delete_symbols = tx.prepare(
                "DELETE FROM symbols WHERE file_id = (SELECT id FROM files WHERE path = ?1)",
            )?;
            let mut delete_file = tx.prepare("DELETE FROM files WHERE path = ?1")?;
            for path in paths {
                delete_chunks.execute(params![path])?;
                delete_symbols.execute(params![path])?;
                removed += delete_file.execute(params![path])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Content hashes of every indexed file, keyed by relative path.
    pub fn file_hashes(&self) -> Result<HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT path, hash FROM files")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut hashes = HashMap::new();
        for row in rows {
            let (path, hash) = row?;
            hashes.insert(path, hash);
        }
        Ok(hashes)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };
        let files = count("SELECT COUNT(*) FROM files")?;
        let symbols = count("SELECT COUNT(*) FROM symbols")?;
        let chunks = count("SELECT COUNT(*) FROM chunks")?;

        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(language, 'text'), COUNT(*) FROM files
             GROUP BY language ORDER BY COUNT(*) DESC, language",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LanguageCount {
                language: row.get(0)?,
                files: row.get::<_, i64>(1)? as usize,
            })
        })?;
        let mut languages = Vec::new();
        for row in rows {
            languages.push(row?);
        }

        let last_indexed: Option<i64> =
            self.conn
                .query_row("SELECT MAX(indexed_at) FROM files", [], |row| row.get(0))?;

        Ok(StoreStats {
            files,
            symbols,
            chunks,
            languages,
            last_indexed,
        })
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
