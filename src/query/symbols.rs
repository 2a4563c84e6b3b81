//! Symbol lookup command (prefix match, optional kind filter)

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::query::{resolve_format, resolve_root};
use ciq::config::Config;
use ciq::output::print_json;
use ciq::store::Store;

/// Run the symbols command
pub fn run(
    name: &str,
    kind: Option<&str>,
    path: Option<&str>,
    limit: Option<usize>,
    format: Option<OutputFormat>,
    compact: bool,
) -> Result<()> {
    let root = resolve_root(path)?;
    let config = Config::load_for_dir(&root);
    let format = resolve_format(format, &config);
    let limit = config.merge_max_results(limit);

    let store = Store::open_existing(&root)?;
    let kind_filter = kind.map(|k| k.to_lowercase());
    let results = store.symbols_with_prefix(name, kind_filter.as_deref(), limit)?;

    match format {
        OutputFormat::Json => print_json(&results, compact)?,
        OutputFormat::Text => {
            if results.is_empty() {
                println!("{} No symbols found matching: {}", "✗".red(), name.yellow());
            } else {
                for result in &results {
                    let kind_str = format!("[{}]", result.kind);
                    println!(
                        "  {} {} {}:{}",
                        kind_str.blue(),
                        result.name.green(),
                        result.path.cyan(),
                        result.line.to_string().yellow()
                    );
                }
                println!(
                    "\n{} Found {} symbols",
                    "✓".green(),
                    results.len().to_string().cyan()
                );
            }
        }
    }

    Ok(())
}
