//! Integration tests for the buildlens command line
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use assert_cmd::Command;
use predicates::prelude::*;
use utils::*;

fn buildlens() -> Command {
    Command::cargo_bin("buildlens").unwrap()
}

#[test]
fn test_suggest_text_output() {
    let trace = write_trace_file(&engine_trace()).unwrap();

    buildlens()
        .arg("suggest")
        .arg("--trace")
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Add include/core.h to the precompiled header",
        ))
        .stdout(predicate::str::contains("[Critical]"));
}

#[test]
fn test_suggest_json_output_parses() {
    let trace = write_trace_file(&engine_trace()).unwrap();

    let output = buildlens()
        .arg("suggest")
        .arg("--trace")
        .arg(trace.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["type"], "PCH_ADDITION");
    assert_eq!(list[0]["file_path"], "include/core.h");
}

#[test]
fn test_suggest_with_config() {
    let trace = write_trace_file(&engine_trace()).unwrap();
    let config = write_text_file("[suggestions]\nmin_time_savings_ms = 1000000.0\n").unwrap();

    buildlens()
        .arg("suggest")
        .arg("--trace")
        .arg(trace.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No suggestions"));
}

#[test]
fn test_suggest_with_invalid_config_fails() {
    let trace = write_trace_file(&engine_trace()).unwrap();
    let config = write_text_file("[suggestions]\nmin_confidence = 7.0\n").unwrap();

    buildlens()
        .arg("suggest")
        .arg("--trace")
        .arg(trace.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_missing_trace_fails() {
    buildlens()
        .args(["suggest", "--trace", "/nonexistent/trace.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read trace file"));
}

#[test]
fn test_malformed_trace_fails() {
    let trace = write_text_file("{ not json").unwrap();

    buildlens()
        .arg("templates")
        .arg("--trace")
        .arg(trace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid trace file"));
}

#[test]
fn test_pch_plan_output() {
    let trace = write_trace_file(&engine_trace()).unwrap();

    buildlens()
        .arg("pch")
        .arg("--trace")
        .arg(trace.path())
        .args(["--current", "include/legacy.h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+2 / -1"))
        .stdout(predicate::str::contains("  - include/legacy.h"))
        .stdout(predicate::str::contains("#pragma once"))
        .stdout(predicate::str::contains("#include \"include/math.h\""));
}

#[test]
fn test_pch_rejects_bad_ratio() {
    let trace = write_trace_file(&engine_trace()).unwrap();

    buildlens()
        .arg("pch")
        .arg("--trace")
        .arg(trace.path())
        .args(["--min-ratio", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--min-ratio"));
}

#[test]
fn test_templates_report() {
    let trace = write_trace_file(&engine_trace()).unwrap();

    buildlens()
        .arg("templates")
        .arg("--trace")
        .arg(trace.path())
        .args(["--top", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vector<T> (120.0 ms over 4 instantiations)"))
        .stdout(predicate::str::contains("std::vector").not());
}

#[test]
fn test_templates_json() {
    let trace = write_trace_file(&engine_trace()).unwrap();

    let output = buildlens()
        .arg("templates")
        .arg("--trace")
        .arg(trace.path())
        .args(["--format", "json", "--threshold", "100"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["name"], "Vector<T>");
}

#[test]
fn test_help_lists_subcommands() {
    buildlens()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("pch"))
        .stdout(predicate::str::contains("templates"));
}
