//! End-to-end tests for the stex binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn stex() -> Command {
    Command::cargo_bin("stex").unwrap()
}

#[test]
fn mask_inline_text_last4() {
    stex()
        .args(["mask", "--text", "SSN 123-45-6789", "--strategy", "last4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*******6789"));
}

#[test]
fn mask_full_strategy_tags() {
    stex()
        .args(["mask", "--text", "mail joe@example.com", "--strategy", "full"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[REDACTED:EMAIL]"));
}

#[test]
fn mask_json_reports_findings() {
    stex()
        .args([
            "mask",
            "--text",
            "card 4532-1234-5678-9012",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("pan_generic"));
}

#[test]
fn mask_check_clean_text() {
    stex()
        .args(["mask", "--check", "--text", "nothing sensitive here"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no PII detected"));
}

#[test]
fn mask_requires_some_input() {
    stex().arg("mask").assert().failure();
}

#[test]
fn parse_statement_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "01/15/2024 WALMART SUPERCENTER #1234 $45.67").unwrap();
    writeln!(file, "Total Balance: $1,204.55").unwrap();

    stex()
        .args(["parse", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("WALMART"))
        .stdout(predicate::str::contains("45.67").and(predicate::str::contains("1204.55").not()));
}

#[test]
fn parse_csv_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "01/15/2024 STARBUCKS COFFEE $4.85").unwrap();

    stex()
        .args(["parse", file.path().to_str().unwrap(), "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("date,merchant,description,amount,category"))
        .stdout(predicate::str::contains("STARBUCKS"));
}

#[test]
fn parse_missing_file_fails() {
    stex()
        .args(["parse", "/nonexistent/statement.txt"])
        .assert()
        .failure();
}

#[test]
fn process_uses_keyword_rules() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "01/15/2024 WALMART SUPERCENTER $45.67").unwrap();

    stex()
        .env_remove("OPENAI_API_KEY")
        .args(["process", file.path().to_str().unwrap(), "--no-model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("\"method\": \"rules\""));
}

#[test]
fn process_document_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"kind":"receipt","merchant":"SAFEWAY","total":"32.50","items":[{{"name":"MILK 2L"}}]}}"#
    )
    .unwrap();

    stex()
        .env_remove("OPENAI_API_KEY")
        .args(["process", file.path().to_str().unwrap(), "--document", "--no-model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SAFEWAY"))
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn detectors_lists_registry() {
    stex()
        .arg("detectors")
        .assert()
        .success()
        .stdout(predicate::str::contains("routing_us"))
        .stdout(predicate::str::contains("pan_generic"));
}

#[test]
fn detectors_category_filter() {
    stex()
        .args(["detectors", "--category", "contact", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email"))
        .stdout(predicate::str::contains("routing_us").not());
}

#[test]
fn config_path_prints_location() {
    stex()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}
