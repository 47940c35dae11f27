//! CLI Integration Tests
//!
//! Runs the `sheet-filter` binary with assert_cmd.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use sheet_filter::excel::{ExcelExporter, ExcelImporter};
use sheet_filter::{CellValue, Column, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_ages(dir: &Path) -> PathBuf {
    let path = dir.join("ages.xlsx");
    let table = Table::from_columns(vec![Column::new(
        "age",
        vec![
            CellValue::Number(20.0),
            CellValue::Number(40.0),
            CellValue::Number(70.0),
        ],
    )])
    .unwrap();
    ExcelExporter::new(&table)
        .with_index(false)
        .export(&path)
        .unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("sheet-filter").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eligibility"))
        .stdout(predicate::str::contains("rules"));
}

#[test]
fn test_server_help() {
    let mut cmd = Command::cargo_bin("sheet-filter-server").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--storage"));
}

// ═══════════════════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rules_command() {
    let tmp = TempDir::new().unwrap();
    let source = write_ages(tmp.path());
    let payload = tmp.path().join("rules.json");
    fs::write(
        &payload,
        r#"{"numerical": [{"variable": "age", "description": ["<30", "30-60", ">60"], "subscore": [1, 2, 3]}],
            "categories": [{"variable": "Gender", "description": ["M"], "subscore": [1]}],
            "ruleName": "scored"}"#,
    )
    .unwrap();
    let storage = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("sheet-filter").unwrap();
    cmd.arg("rules")
        .arg(&source)
        .arg(&payload)
        .arg("--storage")
        .arg(&storage)
        .assert()
        .success()
        .stdout(predicate::str::contains("scored.xlsx"))
        .stdout(predicate::str::contains("Gender"));

    let output = ExcelImporter::new(storage.join("scored.xlsx")).import().unwrap();
    assert_eq!(
        output.column("rule_score").unwrap().values,
        vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Number(3.0),
        ]
    );
}

#[test]
fn test_eligibility_command() {
    let tmp = TempDir::new().unwrap();
    let source = write_ages(tmp.path());
    let payload = tmp.path().join("eligibility.json");
    fs::write(
        &payload,
        r#"[{"eligibilityName": "adults", "eligibilityJson": {"categories": [],
            "numerical": [{"variable": "age", "operator": "> X >", "lValue": 65, "rValue": 30}]}}]"#,
    )
    .unwrap();
    let storage = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("sheet-filter").unwrap();
    cmd.arg("eligibility")
        .arg(&source)
        .arg(&payload)
        .arg("--storage")
        .arg(&storage)
        .assert()
        .success()
        .stdout(predicate::str::contains("adults.xlsx"));

    let output = ExcelImporter::new(storage.join("adults.xlsx")).import().unwrap();
    assert_eq!(
        output.column("age").unwrap().values,
        vec![CellValue::Number(40.0)]
    );
}

#[test]
fn test_eligibility_command_invalid_operator_fails() {
    let tmp = TempDir::new().unwrap();
    let source = write_ages(tmp.path());
    let payload = tmp.path().join("eligibility.json");
    fs::write(
        &payload,
        r#"{"numerical": [{"variable": "age", "operator": "??", "value": 1}]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("sheet-filter").unwrap();
    cmd.arg("eligibility")
        .arg(&source)
        .arg(&payload)
        .arg("--storage")
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidOperator"));
}
