//! Smoke tests for the storefront-probe CLI
//!
//! Every run here uses `--mock`, so no browser is needed.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the storefront-probe binary
fn probe() -> Command {
    let mut cmd = Command::cargo_bin("storefront-probe").expect("binary should exist");
    for var in [
        "STOREFRONT_PROBE_DATA",
        "STOREFRONT_PROBE_CONFIG",
        "STOREFRONT_PROBE_SEED",
        "STOREFRONT_PROBE_JOBS",
        "STOREFRONT_PROBE_MOCK",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    probe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    probe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    probe().assert().failure();
}

#[test]
fn test_run_help_lists_selection_flags() {
    probe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("--tag"))
        .stdout(predicate::str::contains("--mock"))
        .stdout(predicate::str::contains("STOREFRONT_PROBE_SEED"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_shows_catalog() {
    probe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cart-single-item"))
        .stdout(predicate::str::contains("favorites-duplicate-rejected"))
        .stdout(predicate::str::contains("discount-rental-bundle"));
}

#[test]
fn test_list_by_tag() {
    let output = probe().args(["list", "--tag", "favorites"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(!stdout.contains("cart-single-item"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_redacts_password() {
    probe()
        .arg("config")
        .arg("--data")
        .arg(fixture("test_data.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("hello@gmail.com"))
        .stdout(predicate::str::contains("CorrectPassword").not());
}

#[test]
fn test_config_reads_yaml_and_env() {
    probe()
        .args(["config", "--json", "--config"])
        .arg(fixture("probe.yaml"))
        .env("STOREFRONT_PROBE_JOBS", "3")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"seed\": 24301"))
        .stdout(predicate::str::contains("\"jobs\": 3"));
}

#[test]
fn test_config_reads_cent_tolerance() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("probe.yaml");
    fs::write(&path, "price_tolerance:\n  cents: 2\n").unwrap();

    probe()
        .args(["config", "--json", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cents\": 2"));
}

#[test]
fn test_config_rejects_bad_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("probe.toml");
    fs::write(&path, "jobs = 1").unwrap();

    probe()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported config format"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_mock_suite_passes() {
    probe()
        .args(["--color", "never", "run", "--mock", "-j", "3"])
        .arg("--data")
        .arg(fixture("test_data.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("PASS cart-single-item"))
        .stderr(predicate::str::contains("PASS checkout-cash-on-delivery"))
        .stderr(predicate::str::contains("PASSED 9 scenarios"));
}

#[test]
fn test_run_no_selection_fails() {
    probe()
        .args(["run", "--mock", "--filter", "no-such-scenario"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No scenario selected"));
}

#[test]
fn test_run_failure_sets_exit_code() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("probe.yaml");
    fs::write(&config, "discount_rule:\n  multiplier: \"0.8\"\n").unwrap();

    probe()
        .args(["--color", "never", "run", "--mock", "--tag", "discount", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FAIL discount-rental-bundle"))
        .stderr(predicate::str::contains("1 of 1 scenario(s) failed"));
}

#[test]
fn test_run_writes_junit_report() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.xml");

    probe()
        .args(["-q", "run", "--mock", "--tag", "favorites", "--format", "junit", "--report"])
        .arg(&report)
        .assert()
        .success();

    let xml = fs::read_to_string(&report).unwrap();
    assert!(xml.contains(r#"tests="2" failures="0""#));
    assert!(xml.contains("favorites-duplicate-rejected"));
}

#[test]
fn test_run_writes_json_report() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.json");

    probe()
        .args(["-q", "run", "--mock", "--filter", "search-wood", "--seed", "9", "--report"])
        .arg(&report)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["seed"], 9);
    assert_eq!(json["results"][0]["status"], "passed");
}
