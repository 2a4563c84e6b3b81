// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use serde_json::Value;

fn ciq() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ciq"))
}

fn classify_json(query: &str) -> Value {
    let output = ciq()
        .args(["--format", "json", "classify", query])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_str(&String::from_utf8(output).expect("utf8")).expect("json payload")
}

#[test]
fn identifiers_classify_as_symbol_lookups() {
    for query in ["parseConfig", "XMLParser", "next_token", "MAX_RETRIES"] {
        let payload = classify_json(query);
        assert_eq!(payload["intent"], "symbol", "query {query:?}");
        assert_eq!(payload["rule"], "single-identifier", "query {query:?}");
        assert_eq!(payload["confidence"].as_f64(), Some(0.7), "query {query:?}");
    }
}

#[test]
fn phrases_with_common_words_classify_as_natural() {
    let payload = classify_json("how does auth work");
    assert_eq!(payload["intent"], "natural");
    assert_eq!(payload["rule"], "common-phrase");
    assert_eq!(payload["confidence"].as_f64(), Some(0.8));
}

#[test]
fn uppercase_operators_classify_as_natural_before_anything_else() {
    let payload = classify_json("error AND handler");
    assert_eq!(payload["intent"], "natural");
    assert_eq!(payload["rule"], "boolean-operators");
    assert_eq!(payload["confidence"].as_f64(), Some(0.9));

    // Lowercase "and" is just a common word, not an operator.
    let lower = classify_json("error and handler");
    assert_eq!(lower["rule"], "common-phrase");
}

#[test]
fn identifier_phrases_and_single_common_words_go_hybrid() {
    let phrase = classify_json("parseConfig resolveHost");
    assert_eq!(phrase["intent"], "hybrid");
    assert_eq!(phrase["rule"], "identifier-phrase");
    assert_eq!(phrase["confidence"].as_f64(), Some(0.6));

    let single = classify_json("token");
    assert_eq!(single["intent"], "hybrid");
    assert_eq!(single["rule"], "single-common");
}

#[test]
fn empty_query_is_natural_with_zero_confidence() {
    let payload = classify_json("");
    assert_eq!(payload["intent"], "natural");
    assert_eq!(payload["rule"], "empty");
    assert_eq!(payload["confidence"].as_f64(), Some(0.0));
    assert_eq!(payload["normalized"], "");
}

#[test]
fn analysis_carries_the_feature_evidence() {
    let payload = classify_json("  parseConfig  ");
    assert_eq!(payload["query"], "  parseConfig  ");
    assert_eq!(payload["normalized"], "parseConfig");
    assert_eq!(payload["features"]["word_count"], 1);
    assert_eq!(payload["features"]["looks_like_identifier"], true);
    assert_eq!(payload["features"]["contains_common_words"], false);
}

#[test]
fn text_output_prints_the_decision() {
    use predicates::prelude::*;

    ciq()
        .args(["classify", "how does auth work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("intent:     natural"))
        .stdout(predicate::str::contains("confidence: 0.80"))
        .stdout(predicate::str::contains("rule:       common-phrase"));
}
