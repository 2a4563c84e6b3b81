// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn ciq() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ciq"))
}

fn setup_project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let src = dir.path().join("src");
    fs::create_dir_all(&src).expect("create src");

    fs::write(
        src.join("calc.ts"),
        "export class Calculator {\n  add(a: number, b: number): number {\n    return a + b;\n  }\n}\n\nexport function calcTotal(xs: number[]): number {\n  return xs.reduce((a, b) => a + b, 0);\n}\n",
    )
    .expect("write calc.ts");

    ciq().current_dir(dir.path()).arg("index").assert().success();
    dir
}

fn symbols_json(root: &Path, args: &[&str]) -> Value {
    let mut full_args = vec!["--format", "json", "symbols"];
    full_args.extend_from_slice(args);

    let output = ciq()
        .current_dir(root)
        .args(full_args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_str(&String::from_utf8(output).expect("utf8")).expect("json payload")
}

#[test]
fn prefix_lookup_is_case_insensitive() {
    let dir = setup_project();

    let results = symbols_json(dir.path(), &["calc"]);
    let rows = results.as_array().expect("rows");
    assert_eq!(rows.len(), 2);

    let names: Vec<&str> = rows
        .iter()
        .map(|r| r["name"].as_str().expect("name"))
        .collect();
    assert!(names.contains(&"Calculator"));
    assert!(names.contains(&"calcTotal"));
}

#[test]
fn kind_filter_narrows_matches() {
    let dir = setup_project();

    let functions = symbols_json(dir.path(), &["calc", "-T", "function"]);
    let rows = functions.as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "calcTotal");
    assert_eq!(rows[0]["kind"], "function");

    let classes = symbols_json(dir.path(), &["calc", "--kind", "class"]);
    assert_eq!(classes.as_array().expect("rows").len(), 1);
}

#[test]
fn rows_carry_location_details() {
    let dir = setup_project();

    let results = symbols_json(dir.path(), &["add"]);
    let rows = results.as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["kind"], "method");
    assert_eq!(rows[0]["path"], "src/calc.ts");
    assert_eq!(rows[0]["line"], 2);
    assert!(rows[0]["column"].as_u64().expect("column") >= 1);
}

#[test]
fn limit_caps_the_result_count() {
    let dir = setup_project();

    let results = symbols_json(dir.path(), &["calc", "-m", "1"]);
    assert_eq!(results.as_array().expect("rows").len(), 1);
}

#[test]
fn text_output_lists_matches_or_says_none() {
    let dir = setup_project();

    ciq()
        .current_dir(dir.path())
        .args(["symbols", "Calcu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[class] Calculator"))
        .stdout(predicate::str::contains("src/calc.ts"))
        .stdout(predicate::str::contains("Found 1 symbols"));

    ciq()
        .current_dir(dir.path())
        .args(["symbols", "nosuchsymbol"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No symbols found matching: nosuchsymbol",
        ));
}
