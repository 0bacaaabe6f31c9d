//! Integration tests for catalog inspection via CLI.
//!
//! These tests verify that `cur catalog show` and `cur catalog check` parse
//! catalog TOML files and report the generic layout's dependency state in
//! both JSON and human-readable formats.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CATALOG: &str = r#"
name = "ME 2024-25"

[[categories]]
code = "MS"
name = "Math and Science"
order = 1

[[categories]]
code = "ME"
name = "Mechanical Engineering"
order = 2

[[courses]]
name = "MTH 171"
credits = 4.0
categories = ["MS"]
full_name = "Calculus I"

[[courses]]
name = "MTH 172"
credits = 4.0
categories = ["MS"]
full_name = "Calculus II"
prereqs = ["MTH 171"]

[[courses]]
name = "ME 201"
credits = 2.0
categories = ["ME"]

[terms]
"1F" = ["MTH 171"]
"1S" = ["MTH 172"]
"#;

/// Get a Command for the cur binary with an isolated data directory.
fn cur_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cur"));
    cmd.current_dir(dir.path());
    cmd.env("CUR_DATA_DIR", dir.path().join("data"));
    cmd
}

/// Write the sample catalog into the temp dir and return the temp dir.
fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("catalog.toml"), CATALOG).unwrap();
    temp
}

#[test]
fn test_catalog_show_json() {
    let temp = setup();

    cur_in(&temp)
        .args(["catalog", "show", "catalog.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"ME 2024-25\""))
        .stdout(predicate::str::contains("\"course_count\":3"))
        .stdout(predicate::str::contains("\"MTH 171\""));
}

#[test]
fn test_catalog_show_human() {
    let temp = setup();

    cur_in(&temp)
        .args(["catalog", "show", "catalog.toml", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ME 2024-25 (3 courses)"))
        .stdout(predicate::str::contains("MTH 171: Calculus I"));
}

#[test]
fn test_catalog_check_reports_generic_layout() {
    let temp = setup();

    // MTH 172 sits after MTH 171 in the generic layout, so prereqs hold.
    // ME 201 is unplaced, which leaves the ME credit requirement unmet.
    cur_in(&temp)
        .args(["catalog", "check", "catalog.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\":false"))
        .stdout(predicate::str::contains("\"dependency_issues\":{}"))
        .stdout(predicate::str::contains("\"ME\""));
}

#[test]
fn test_catalog_check_flags_same_term_prereq() {
    let temp = TempDir::new().unwrap();
    let bad = CATALOG.replace(
        "\"1F\" = [\"MTH 171\"]\n\"1S\" = [\"MTH 172\"]",
        "\"1F\" = [\"MTH 171\", \"MTH 172\"]",
    );
    std::fs::write(temp.path().join("catalog.toml"), bad).unwrap();

    cur_in(&temp)
        .args(["catalog", "check", "catalog.toml", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "MTH 172: unmet prerequisites: MTH 171",
        ));
}

#[test]
fn test_catalog_show_missing_file() {
    let temp = TempDir::new().unwrap();

    cur_in(&temp)
        .args(["catalog", "show", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_catalog_rejects_unknown_category() {
    let temp = TempDir::new().unwrap();
    let bad = CATALOG.replace("categories = [\"ME\"]", "categories = [\"XX\"]");
    std::fs::write(temp.path().join("catalog.toml"), bad).unwrap();

    cur_in(&temp)
        .args(["catalog", "show", "catalog.toml", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("category"));
}
