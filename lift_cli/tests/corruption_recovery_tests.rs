//! Corruption recovery tests for the lift binary.
//!
//! These tests verify the system can handle:
//! - Corrupted routine files
//! - Corrupted WAL files
//! - Partial writes
//! - Routines with broken day numbering

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use std::path::Path;
use tempfile::TempDir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn save_plan(data_dir: &Path) {
    cli(data_dir)
        .args(["plan", "--days", "3", "--save"])
        .assert()
        .success();
}

#[test]
fn test_corrupted_routine_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("routine.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted routine");

    // Treated as no routine, which points the user at plan --save
    cli(data_dir)
        .arg("next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active routine"));

    // A fresh plan replaces it
    save_plan(data_dir);
    cli(data_dir).arg("next").assert().success();
}

#[test]
fn test_corrupted_wal_lines_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    save_plan(data_dir);

    fs::create_dir_all(data_dir.join("wal")).unwrap();
    fs::write(
        data_dir.join("wal/completions.wal"),
        "{ invalid json }\n{ more invalid }",
    )
    .expect("Failed to write corrupted WAL");

    cli(data_dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("NEXT: DAY 1 OF 3"));
}

#[test]
fn test_partial_wal_line() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    save_plan(data_dir);

    cli(data_dir).args(["next", "--done"]).assert().success();

    // Simulate a crash mid-append
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(data_dir.join("wal/completions.wal"))
        .unwrap();
    write!(file, r#"{{"id":"00000000-0000-0000-0000-000000000000","routine_id":"#).unwrap();
    drop(file);

    cli(data_dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("NEXT: DAY 2 OF 3"));
}

#[test]
fn test_routine_missing_day_one_reports_inconsistency() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    save_plan(data_dir);

    // Renumber day 1 by hand so the routine starts at day 2
    let routine_path = data_dir.join("routine.json");
    let mut routine: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&routine_path).unwrap()).unwrap();
    routine["days"][0]["day_order"] = serde_json::json!(4);
    fs::write(&routine_path, routine.to_string()).unwrap();

    cli(data_dir)
        .args(["log", "--day", "4"])
        .assert()
        .success();

    cli(data_dir)
        .arg("next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Routine data is inconsistent"));
}
