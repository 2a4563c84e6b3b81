// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared output helpers for CLI commands

use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;

/// Whether stdout should carry ANSI colors
pub fn use_colors() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Serialize a value to stdout as JSON, pretty by default
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}

pub fn colorize_path(path: &str, use_color: bool) -> String {
    if use_color {
        path.cyan().to_string()
    } else {
        path.to_string()
    }
}

pub fn colorize_line_num(line: usize, use_color: bool) -> String {
    if use_color {
        line.to_string().yellow().to_string()
    } else {
        line.to_string()
    }
}

pub fn colorize_match(text: &str, use_color: bool) -> String {
    if use_color {
        text.red().bold().to_string()
    } else {
        text.to_string()
    }
}

pub fn colorize_kind(kind: &str, use_color: bool) -> String {
    if use_color {
        kind.blue().to_string()
    } else {
        kind.to_string()
    }
}

pub fn colorize_score(score: f64, use_color: bool) -> String {
    let rendered = format!("{score:.2}");
    if use_color {
        rendered.dimmed().to_string()
    } else {
        rendered
    }
}
