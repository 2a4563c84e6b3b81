// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source parsing: tree-sitter grammars, symbol extraction, chunk building

pub mod chunks;
pub mod languages;
pub mod symbols;
