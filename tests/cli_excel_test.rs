//! Integration tests for the spreadsheet round trip via CLI.
//!
//! These tests verify `fm export` / `fm import`: the round-trip law,
//! import atomicity on bad files, and idempotence.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;

fn annotate(env: &TestEnv) {
    env.fm()
        .args(["project", "移設第一期"])
        .assert()
        .success();
    env.fm()
        .args(["status", "N-01", "in-progress"])
        .assert()
        .success();
    env.fm()
        .args(["assignee", "set", "N-01", "宮崎", "若林"])
        .assert()
        .success();
    env.fm()
        .args(["due", "N-01", "2026-04-01"])
        .assert()
        .success();
    env.fm()
        .args(["status", "N-03", "completed"])
        .assert()
        .success();
}

#[test]
fn test_export_writes_workbook_file() {
    let env = TestEnv::new();
    annotate(&env);

    let out = env.project_path().join("status.xlsx");
    env.fm()
        .args(["export", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nodes\":3"));

    assert!(out.exists());
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn test_export_then_import_restores_annotations() {
    let env = TestEnv::new();
    annotate(&env);

    let out = env.project_path().join("roundtrip.xlsx");
    env.fm()
        .args(["export", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    // Wipe everything, then import the exported file.
    env.fm().args(["clear", "--force"]).assert().success();
    env.fm()
        .args(["status", "N-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"pending\""));

    env.fm()
        .args(["import", out.to_str().unwrap()])
        .assert()
        .success();

    env.fm()
        .args(["show", "N-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"inProgress\""))
        .stdout(predicate::str::contains("宮崎, 若林"))
        .stdout(predicate::str::contains("2026-04-01"));
    env.fm()
        .args(["status", "N-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"completed\""));
    env.fm()
        .args(["project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("移設第一期"));

    // Memo is not part of the sheet and stays cleared.
    env.fm()
        .args(["memo", "N-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"memo\":\"\""));
}

#[test]
fn test_import_twice_is_idempotent() {
    let env = TestEnv::new();
    annotate(&env);

    let out = env.project_path().join("twice.xlsx");
    env.fm()
        .args(["export", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    env.fm()
        .args(["import", out.to_str().unwrap()])
        .assert()
        .success();
    let first = env.fm().arg("list").output().unwrap().stdout;

    env.fm()
        .args(["import", out.to_str().unwrap()])
        .assert()
        .success();
    let second = env.fm().arg("list").output().unwrap().stdout;

    // Everything except the volatile last-updated stamp matches.
    let strip = |bytes: &[u8]| {
        let v: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        v["nodes"].clone()
    };
    assert_eq!(strip(&first), strip(&second));
}

#[test]
fn test_import_garbage_file_fails_and_leaves_state_untouched() {
    let env = TestEnv::new();
    annotate(&env);

    let bad = env.project_path().join("not-a-workbook.xlsx");
    std::fs::write(&bad, "plain text pretending to be a workbook").unwrap();

    env.fm()
        .args(["import", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import failed"));

    env.fm()
        .args(["show", "N-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"inProgress\""));
}

#[test]
fn test_import_without_header_row_fails_and_leaves_state_untouched() {
    let env = TestEnv::new();
    annotate(&env);

    // A real workbook, but with no "ID" cell in column 0 of any row.
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Project Name").unwrap();
    sheet.write_string(0, 1, "乗っ取り案件").unwrap();
    sheet.write_string(1, 0, "nothing").unwrap();
    sheet.write_string(2, 0, "here").unwrap();
    let bad = env.project_path().join("headerless.xlsx");
    workbook.save(bad.to_str().unwrap()).unwrap();

    env.fm()
        .args(["import", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("header"));

    // Neither annotations nor the project name changed.
    env.fm()
        .args(["show", "N-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"inProgress\""));
    env.fm()
        .args(["project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("移設第一期"));
}

#[test]
fn test_import_missing_file_fails() {
    let env = TestEnv::new();

    env.fm()
        .args(["import", "does-not-exist.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import failed"));
}

#[test]
fn test_export_default_filename_uses_project_name() {
    let env = TestEnv::new();
    env.fm().args(["project", "案件A"]).assert().success();

    let output = env.fm().arg("export").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let file = result["file"].as_str().unwrap();
    assert!(file.contains("案件A_"));
    assert!(file.ends_with(".xlsx"));
    assert!(env.project_path().join(file).exists());
}
