// SPDX-License-Identifier: MIT OR Apache-2.0

//! ciq - local code intelligence
//!
//! Indexes a project into an embedded SQLite database (symbol tables plus an
//! FTS5 full-text index) and answers queries by classifying their intent and
//! routing them to the right backend: exact symbol lookup, ranked full-text
//! search, or a merged hybrid of both.
//!
//! The library exposes the engine pieces; the `ciq` binary layers the CLI,
//! the tree-sitter indexing pipeline, and watch mode on top.

pub mod classify;
pub mod config;
pub mod errors;
pub mod output;
pub mod search;
pub mod store;
