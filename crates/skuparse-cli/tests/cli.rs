use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skuparse() -> Command {
    Command::cargo_bin("skuparse").unwrap()
}

fn sample_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.json");
    skuparse()
        .args(["config", "init", "--sample", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    path
}

fn with_config(path: &Path) -> Command {
    let mut cmd = skuparse();
    cmd.arg("--config").arg(path);
    cmd
}

#[test]
fn classify_sku() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["classify", "acm widget 2kg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brand: ACME"));
}

#[test]
fn classify_excluded_sku_with_audit() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["classify", "--audit", "acm widget used"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brand: -"))
        .stdout(predicate::str::contains("excluded by: USED"));
}

#[test]
fn classify_unknown_table_fails() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["classify", "--table", "color", "acm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown table: color"));
}

#[test]
fn extract_range() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["extract", "--attribute", "weight", "acm sugar 1-2kg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weight: 1000-2000g"));
}

#[test]
fn extract_json() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["extract", "--format", "json", "box 5 kg"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""value": "5000g""#));
}

#[test]
fn batch_writes_csv_in_input_order() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);
    let input = dir.path().join("skus.tsv");
    let output = dir.path().join("out.csv");
    fs::write(
        &input,
        "id\tsku\n1\tacm widget 2kg\n2\tplain 3 kg\n3\tacm used\n4\t\n5\tACM 500 kg\n",
    )
    .unwrap();

    with_config(&config)
        .args(["batch", "--column", "2", "--skip-header", "-j", "3", "--audit"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 5 SKUs"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "sku,brand,weight,brand_main,brand_limiting_main,brand_limiting_additional",
            "acm widget 2kg,ACME,2000g,ACM,,",
            "plain 3 kg,,3000g,,,",
            "acm used,,,,,",
            ",,,,,",
            "ACM 500 kg,ACME,500000g,ACM,,",
        ]
    );
}

#[test]
fn batch_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["batch"])
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn config_check_reports_counts() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 tables, 1 attributes"));
}

#[test]
fn config_check_rejects_bad_regex() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(
        &config,
        r#"{"attributes": [{"name": "w", "patterns": [{"type": "value", "indicator": "(kg"}]}]}"#,
    )
    .unwrap();

    with_config(&config)
        .args(["config", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid regex"));
}

#[test]
fn config_get_key() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    with_config(&config)
        .args(["config", "get", "tables.0.rules.0.label"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ACME\""));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = sample_config(&dir);

    skuparse()
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
