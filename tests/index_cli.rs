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

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write file");
}

fn index_json(root: &Path, extra: &[&str]) -> Value {
    let mut args = vec!["--format", "json", "index"];
    args.extend_from_slice(extra);

    let output = ciq()
        .current_dir(root)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_str(&String::from_utf8(output).expect("utf8")).expect("json payload")
}

#[test]
fn first_build_indexes_everything_and_reports_counts() {
    let dir = TempDir::new().expect("tempdir");
    write_file(
        &dir.path().join("src/calc.ts"),
        "export class Calculator {\n  add(a: number, b: number) { return a + b; }\n}\n",
    );
    write_file(&dir.path().join("README.md"), "# Project\nsearch notes\n");

    let stats = index_json(dir.path(), &[]);
    assert_eq!(stats["files_indexed"], 2);
    assert_eq!(stats["files_skipped"], 0);
    assert_eq!(stats["files_removed"], 0);
    assert!(stats["symbols"].as_u64().expect("symbols") >= 2);
    assert!(stats["chunks"].as_u64().expect("chunks") >= 2);

    assert!(dir.path().join(".ciq").join("index.db").is_file());
}

#[test]
fn second_build_skips_unchanged_files() {
    let dir = TempDir::new().expect("tempdir");
    write_file(&dir.path().join("a.rs"), "pub fn alpha() {}\n");
    write_file(&dir.path().join("b.rs"), "pub fn beta() {}\n");

    index_json(dir.path(), &[]);
    let second = index_json(dir.path(), &[]);

    assert_eq!(second["files_indexed"], 0);
    assert_eq!(second["files_skipped"], 2);

    let forced = index_json(dir.path(), &["--force"]);
    assert_eq!(forced["files_indexed"], 2);
}

#[test]
fn edits_and_deletions_are_picked_up_incrementally() {
    let dir = TempDir::new().expect("tempdir");
    write_file(&dir.path().join("a.rs"), "pub fn alpha() {}\n");
    write_file(&dir.path().join("b.rs"), "pub fn beta() {}\n");

    index_json(dir.path(), &[]);

    write_file(&dir.path().join("a.rs"), "pub fn alpha_renamed() {}\n");
    fs::remove_file(dir.path().join("b.rs")).expect("remove b.rs");

    let stats = index_json(dir.path(), &[]);
    assert_eq!(stats["files_indexed"], 1);
    assert_eq!(stats["files_removed"], 1);

    // The renamed symbol is searchable; the deleted one is gone.
    let search = |name: &str| -> Value {
        let output = ciq()
            .current_dir(dir.path())
            .args(["--format", "json", "search", name])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_str(&String::from_utf8(output).expect("utf8")).expect("json")
    };

    assert_eq!(
        search("alpha_renamed")["results"]
            .as_array()
            .expect("results")
            .len(),
        1
    );
    assert_eq!(search("beta")["total_results"], 0);
}

#[test]
fn configured_exclude_patterns_stay_out_of_the_index() {
    let dir = TempDir::new().expect("tempdir");
    write_file(&dir.path().join("keep.rs"), "pub fn keep() {}\n");
    write_file(&dir.path().join("generated/out.rs"), "pub fn skip_me() {}\n");
    write_file(
        &dir.path().join(".ciqrc.toml"),
        "exclude_patterns = [\"generated\"]\n",
    );

    let stats = index_json(dir.path(), &[]);
    assert_eq!(stats["files_indexed"], 2, "keep.rs and .ciqrc.toml");

    let status = status_json(dir.path());
    let files = status["files"].as_u64().expect("files");
    assert_eq!(files, 2);
}

fn status_json(root: &Path) -> Value {
    let output = ciq()
        .current_dir(root)
        .args(["--format", "json", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_str(&String::from_utf8(output).expect("utf8")).expect("json payload")
}

#[test]
fn status_reports_schema_counts_and_languages() {
    let dir = TempDir::new().expect("tempdir");
    write_file(&dir.path().join("lib.rs"), "pub fn probe() {}\n");
    write_file(&dir.path().join("notes.md"), "plain text notes\n");

    index_json(dir.path(), &[]);
    let status = status_json(dir.path());

    assert_eq!(status["schema_version"], 1);
    assert_eq!(status["files"], 2);
    assert!(status["symbols"].as_u64().expect("symbols") >= 1);
    assert!(status["size_bytes"].as_u64().expect("size") > 0);
    assert!(status["last_indexed"].as_i64().is_some());

    let languages = status["languages"].as_array().expect("languages");
    let names: Vec<&str> = languages
        .iter()
        .map(|l| l["language"].as_str().expect("name"))
        .collect();
    assert!(names.contains(&"rust"));
    assert!(names.contains(&"text"));
}

#[test]
fn status_without_an_index_fails_with_guidance() {
    let dir = TempDir::new().expect("tempdir");

    ciq()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index not found"));
}

#[test]
fn text_output_summarizes_the_build() {
    let dir = TempDir::new().expect("tempdir");
    write_file(&dir.path().join("lib.rs"), "pub fn probe() {}\n");

    ciq()
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 1 files"))
        .stdout(predicate::str::contains("symbols"));

    ciq()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema version: 1"))
        .stdout(predicate::str::contains("Files: 1"));
}
