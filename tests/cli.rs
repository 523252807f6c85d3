//! CLI behavior tests

mod fixtures;

use fixtures::config_path;
use std::process::{Command, Output};

fn buildconf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_buildconf"))
        .args(args)
        .arg("--no-host-config")
        .output()
        .expect("failed to run buildconf")
}

fn options(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_buildconf"))
        .args(args)
        .output()
        .expect("failed to run buildconf")
}

#[test]
fn test_check_valid_config() {
    let path = config_path("valid.toml");
    let output = buildconf(&["check", "-c", path.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration valid"));
}

#[test]
fn test_check_invalid_config_lists_all_errors() {
    let path = config_path("invalid.toml");
    let output = buildconf(&["check", "-c", path.to_str().unwrap(), "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"].as_array().map(Vec::len), Some(5));
}

#[test]
fn test_check_strict_flag() {
    let path = config_path("valid.toml");
    let output = buildconf(&["check", "-c", path.to_str().unwrap(), "--strict"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("publicPath"));
}

#[test]
fn test_missing_file_is_load_error() {
    let output = buildconf(&["check", "-c", "/nonexistent/buildconf.toml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_resolve_prints_report() {
    let path = config_path("valid.toml");
    let output = buildconf(&[
        "resolve",
        "-c",
        path.to_str().unwrap(),
        "--mode",
        "electron",
        "--set",
        "sourceMap=true",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["context"]["mode"], "electron");
    assert_eq!(report["resolved"]["config"]["distDir"], "dist/electron");
    assert_eq!(report["resolved"]["config"]["sourceMap"], true);
    assert_eq!(report["resolved"]["config"]["env"]["API_KEY"], "[REDACTED]");
    assert_eq!(report["sources"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_resolve_rejects_unknown_mode() {
    let output = buildconf(&["resolve", "--mode", "desktop"]);
    assert!(!output.status.success());
}

#[test]
fn test_options_markdown() {
    let output = options(&["options", "--format", "markdown"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| `gzip` |"));
    assert!(stdout.contains("| `onPublish` |"));
}

#[test]
fn test_options_json() {
    let output = options(&["options", "--format", "json"]);

    let docs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs["schema_id"], "buildconf/build-options@1");
    assert!(docs["options"].as_array().unwrap().len() > 30);
}
