//! Classify command - show the routing decision for a query

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use ciq::classify::IntentClassifier;
use ciq::config::Config;
use ciq::output::print_json;

/// Run the classify command. Works without an index; classification is
/// purely lexical.
pub fn run(query: &str, format: Option<OutputFormat>, compact: bool) -> Result<()> {
    let config = Config::load();
    let format = crate::query::resolve_format(format, &config);

    let classifier = IntentClassifier::from_config(&config.classifier);
    let analysis = classifier.classify(query);

    match format {
        OutputFormat::Json => print_json(&analysis, compact)?,
        OutputFormat::Text => {
            println!("query:      {}", analysis.query);
            println!("normalized: {}", analysis.normalized);
            println!("intent:     {}", analysis.intent.to_string().cyan());
            println!("confidence: {:.2}", analysis.confidence);
            println!("rule:       {}", analysis.rule);

            let features = &analysis.features;
            println!(
                "features:   words={} identifier={} common={} operators={} special={}",
                features.word_count,
                yes_no(features.looks_like_identifier),
                yes_no(features.contains_common_words),
                yes_no(features.has_boolean_operators),
                yes_no(features.has_special_characters),
            );
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
