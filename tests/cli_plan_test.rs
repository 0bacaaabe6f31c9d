//! Integration tests for student plan operations via CLI.
//!
//! These tests drive the full flow: `cur system init`, `cur plan create`,
//! then schedule mutations (move, complete, drop, substitute, dta, note),
//! checking, repair, and the text report, in both output formats.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CATALOG: &str = r#"
name = "ME 2024-25"

[[categories]]
code = "C"
name = "Core"
order = 0

[[categories]]
code = "MS"
name = "Math and Science"
order = 1

[[categories]]
code = "ME"
name = "Mechanical Engineering"
order = 2

[[courses]]
name = "COR 210"
credits = 3.0
categories = ["C"]

[[courses]]
name = "COR 210W"
credits = 4.0
categories = ["C"]
writing_intensive = true

[[courses]]
name = "COR 250"
credits = 3.0
categories = ["C"]

[[courses]]
name = "COR 250W"
credits = 4.0
categories = ["C"]
writing_intensive = true

[[courses]]
name = "MTH 171"
credits = 4.0
categories = ["MS"]
full_name = "Calculus I"

[[courses]]
name = "MTH 172"
credits = 4.0
categories = ["MS"]
prereqs = ["MTH 171"]

[[courses]]
name = "ME 201"
credits = 2.0
categories = ["ME"]

[terms]
"1F" = ["MTH 171", "COR 210W"]
"1S" = ["MTH 172"]
"2F" = ["ME 201"]

[dta]
AA = ["COR 210", "COR 250"]
"#;

/// Get a Command for the cur binary with an isolated data directory.
fn cur_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cur"));
    cmd.current_dir(dir.path());
    cmd.env("CUR_DATA_DIR", dir.path().join("data"));
    cmd
}

/// Init storage, write the catalog, and create a plan for "alice".
fn setup_plan() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("catalog.toml"), CATALOG).unwrap();
    cur_in(&temp).args(["system", "init"]).assert().success();
    cur_in(&temp)
        .args([
            "plan", "create", "alice", "--catalog", "catalog.toml", "--year", "2024",
            "--season", "Fall",
        ])
        .assert()
        .success();
    temp
}

#[test]
fn test_system_init() {
    let temp = TempDir::new().unwrap();

    cur_in(&temp)
        .args(["system", "init", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized cursus data directory"));
}

#[test]
fn test_plan_requires_init() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("catalog.toml"), CATALOG).unwrap();

    cur_in(&temp)
        .args([
            "plan", "create", "alice", "--catalog", "catalog.toml", "--year", "2024",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not initialized"));
}

#[test]
fn test_plan_create_and_show() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "show", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start\":\"2024-F\""))
        // Generic 1F materialized onto the start term.
        .stdout(predicate::str::contains("\"term\":\"2024-F\""))
        .stdout(predicate::str::contains("MTH 171"));

    cur_in(&temp)
        .args(["plan", "show", "alice", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-S (4 credits)"))
        .stdout(predicate::str::contains("Unscheduled"));
}

#[test]
fn test_plan_create_rejects_duplicate() {
    let temp = setup_plan();

    cur_in(&temp)
        .args([
            "plan", "create", "alice", "--catalog", "catalog.toml", "--year", "2025",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_plan_list() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plans\":[\"alice\"]"));
}

#[test]
fn test_plan_move_and_check() {
    let temp = setup_plan();

    // Moving MTH 172 into the same term as its prerequisite breaks it.
    cur_in(&temp)
        .args(["plan", "move", "alice", "MTH 172", "2024", "Fall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved MTH 172 to 2024-F"));

    cur_in(&temp)
        .args(["plan", "check", "alice", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "MTH 172: unmet prerequisites: MTH 171",
        ));
}

#[test]
fn test_plan_move_rejects_bad_term() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "move", "alice", "MTH 172", "20x4", "Fall"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("year"));
}

#[test]
fn test_plan_complete_and_drop() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "complete", "alice", "MTH 171"])
        .assert()
        .success();

    cur_in(&temp)
        .args(["plan", "drop", "alice", "ME 201"])
        .assert()
        .success();

    cur_in(&temp)
        .args(["plan", "show", "alice", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] MTH 171"))
        // Dropped from the schedule but still in the catalog views.
        .stdout(predicate::str::contains("Unscheduled"))
        .stdout(predicate::str::contains("ME 201"));
}

#[test]
fn test_plan_substitute_transfers_term() {
    let temp = setup_plan();

    // COR 250 is unscheduled; give it MTH 172's slot.
    cur_in(&temp)
        .args(["plan", "substitute", "alice", "MTH 172", "COR 250"])
        .assert()
        .success();

    cur_in(&temp)
        .args(["plan", "show", "alice", "-H"])
        .assert()
        .success()
        // COR 250 now occupies the 2025-S slot.
        .stdout(predicate::str::contains("COR 250 (3)"))
        // MTH 172 keeps its catalog entry but lost its term.
        .stdout(predicate::str::contains("Unscheduled"))
        .stdout(predicate::str::contains("[ ] MTH 172 (4)"));
}

#[test]
fn test_plan_substitute_writing_intensive() {
    let temp = setup_plan();

    cur_in(&temp)
        .args([
            "plan",
            "substitute",
            "alice",
            "COR 210W",
            "COR 250W",
            "--writing-intensive",
        ])
        .assert()
        .success();

    // The W slot moved to COR 250W; the plain COR 210 took the old slot.
    cur_in(&temp)
        .args(["plan", "check", "alice"])
        .assert()
        .success();
}

#[test]
fn test_plan_substitute_writing_intensive_rejects_plain_course() {
    let temp = setup_plan();

    cur_in(&temp)
        .args([
            "plan",
            "substitute",
            "alice",
            "COR 210",
            "COR 250W",
            "--writing-intensive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not writing intensive"));
}

#[test]
fn test_plan_dta_marks_transfer_credit() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "dta", "alice", "AA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied AA exemptions"));

    cur_in(&temp)
        .args(["plan", "show", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"term\":\"Transfer\""));
}

#[test]
fn test_plan_dta_rejects_unknown_kind() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "dta", "alice", "BA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DTA"));
}

#[test]
fn test_plan_note_and_report() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "note", "alice", "AP credit under review"])
        .assert()
        .success();

    cur_in(&temp)
        .args(["plan", "report", "alice", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan Report: alice"))
        .stdout(predicate::str::contains("AP credit under review"))
        .stdout(predicate::str::contains("Math and Science"));
}

#[test]
fn test_plan_repair_fixes_same_term_prereq() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "move", "alice", "MTH 172", "2024", "Fall"])
        .assert()
        .success();

    cur_in(&temp)
        .args(["plan", "repair", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dependency_issues\":{}"));

    cur_in(&temp)
        .args(["plan", "show", "alice", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-S"));
}

#[test]
fn test_plan_unknown_student() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "show", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bob"));
}

#[test]
fn test_plan_set_term_moves_now_marker() {
    let temp = setup_plan();

    cur_in(&temp)
        .args(["plan", "set-term", "alice", "2025", "Fall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current term set to 2025-F"));

    cur_in(&temp)
        .args(["plan", "show", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"current_term\":\"2025-F\""));
}
