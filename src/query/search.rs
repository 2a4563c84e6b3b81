//! Search command - classify the query, route it, render the results

use anyhow::Result;
use colored::Colorize;
use std::time::Duration;
use tracing::debug;

use crate::cli::{CliSearchMode, OutputFormat};
use crate::query::{resolve_format, resolve_root};
use ciq::classify::IntentClassifier;
use ciq::config::Config;
use ciq::output::{
    colorize_kind, colorize_line_num, colorize_match, colorize_path, colorize_score, print_json,
    use_colors,
};
use ciq::search::{ResultOrigin, SearchOrchestrator, SearchResponse, SearchResult};
use ciq::store::Store;

const MAX_SNIPPET_CHARS: usize = 150;

/// Run the search command
pub fn run(
    query: &str,
    path: Option<&str>,
    limit: Option<usize>,
    mode: Option<CliSearchMode>,
    verbose: bool,
    format: Option<OutputFormat>,
    compact: bool,
) -> Result<()> {
    let root = resolve_root(path)?;
    let config = Config::load_for_dir(&root);
    let format = resolve_format(format, &config);
    let limit = config.merge_max_results(limit);

    let store = Store::open_existing(&root)?;
    let classifier = IntentClassifier::from_config(&config.classifier);

    let mut orchestrator = SearchOrchestrator::new(&store, &store, classifier);
    if let Some(ms) = config.search_timeout_ms {
        orchestrator = orchestrator.with_budget(Duration::from_millis(ms));
    }

    debug!(%query, limit, forced = ?mode, "running search");
    let response = orchestrator.search_with_intent(query, limit, mode.map(Into::into))?;

    match format {
        OutputFormat::Json => print_json(&response, compact)?,
        OutputFormat::Text => render_text(&response, verbose),
    }
    Ok(())
}

fn render_text(response: &SearchResponse, verbose: bool) {
    let use_color = use_colors();

    if verbose {
        let analysis = &response.analysis;
        println!(
            "Classified as {} (confidence {:.2}, rule {})",
            analysis.intent, analysis.confidence, analysis.rule
        );
    }

    if response.results.is_empty() {
        if use_color {
            println!(
                "{} No results found for: {}",
                "✗".red(),
                response.query.yellow()
            );
        } else {
            println!("No results found for: {}", response.query);
        }
        return;
    }

    if use_color {
        println!(
            "\n{} Found {} results for: {}\n",
            "✓".green(),
            response.total_results.to_string().cyan(),
            response.query.yellow()
        );
    } else {
        println!(
            "\nFound {} results for: {}\n",
            response.total_results, response.query
        );
    }

    for result in &response.results {
        render_result(result, &response.query, use_color);
    }

    let shown = response.results.len();
    if shown < response.total_results {
        println!(
            "Showing {} of {} results ({:.0}ms)",
            shown, response.total_results, response.elapsed_ms
        );
    }
}

fn render_result(result: &SearchResult, query: &str, use_color: bool) {
    let location = format!(
        "{}:{}",
        colorize_path(&result.path, use_color),
        colorize_line_num(result.line, use_color)
    );
    let score = colorize_score(result.score, use_color);

    match &result.origin {
        ResultOrigin::Symbol {
            name, symbol_kind, ..
        } => {
            let kind = colorize_kind(&format!("[{symbol_kind}]"), use_color);
            let name = if use_color {
                name.green().to_string()
            } else {
                name.clone()
            };
            println!("{location}  {kind} {name}  {score}");
        }
        ResultOrigin::Chunk {
            content,
            chunk_kind,
            ..
        } => {
            let kind = colorize_kind(&format!("[{chunk_kind}]"), use_color);
            println!("{location}  {kind}  {score}");
            let snippet = snippet_line(content, query);
            if !snippet.is_empty() {
                println!("    {}", highlight_matches(&snippet, query, use_color));
            }
        }
    }
    println!();
}

/// Pick the line of a chunk worth showing: the first line containing a query
/// term, else the first non-blank line.
fn snippet_line(content: &str, query: &str) -> String {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();

    let picked = content
        .lines()
        .find(|line| {
            let lower = line.to_lowercase();
            terms.iter().any(|term| lower.contains(term))
        })
        .or_else(|| content.lines().find(|line| !line.trim().is_empty()))
        .unwrap_or("");

    truncate_chars(picked.trim_end(), MAX_SNIPPET_CHARS)
}

fn truncate_chars(line: &str, max: usize) -> String {
    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max).collect();
    format!("{cut}...")
}

fn highlight_matches(text: &str, query: &str, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }

    let mut result = text.to_string();
    for term in query.split_whitespace() {
        let re = regex::RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build();

        if let Ok(re) = re {
            result = re
                .replace_all(&result, |caps: &regex::Captures| {
                    colorize_match(&caps[0], true)
                })
                .to_string();
        }
    }
    result
}
