//! CLI integration tests for all subcommands except `serve`.
//!
//! Uses `assert_cmd` to spawn the `flagpress` binary and verify
//! exit codes, stdout content, and stderr content.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `flagpress` binary, rooted at workspace.
fn flagpress() -> Command {
    let mut cmd = cargo_bin_cmd!("flagpress");
    cmd.current_dir(workspace_root());
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    flagpress()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Feature-flag rule compiler"));
}

#[test]
fn version_exits_0() {
    flagpress()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flagpress"));
}

// ──────────────────────────────────────────────
// 2. Compile
// ──────────────────────────────────────────────

#[test]
fn compile_valid_file_exits_0() {
    let output = flagpress()
        .args(["compile", "demos/web.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"f\""))
        .get_output()
        .stdout
        .clone();

    let doc: serde_json::Value = serde_json::from_slice(&output).expect("JSON document");
    let dark = &doc["f"]["dark_mode"];
    assert_eq!(dark["t"], 0);
    assert_eq!(dark["i"], "v_dark_mode");
    assert_eq!(
        dark["r"][0]["c"][0]["u"]["l"],
        serde_json::json!(["ana@example.com", "bo@example.com"])
    );
    assert_eq!(doc["f"]["max_upload_mb"]["r"][0]["c"][0]["u"]["d"], 18.0);
    assert_eq!(doc["f"]["banner_text"]["r"][0]["c"][0]["u"]["s"], "2.0.0");
}

#[test]
fn compile_json_file_exits_0() {
    flagpress()
        .args(["compile", "demos/mobile.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("new_onboarding"));
}

#[test]
fn compile_fingerprint_matches_document() {
    let fp = flagpress()
        .args(["compile", "demos/web.toml", "--fingerprint"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let fp = String::from_utf8(fp).unwrap();
    let fp = fp.trim();
    assert!(fp.starts_with('"') && fp.ends_with('"'), "{}", fp);
    assert_eq!(fp.len(), 66);

    let again = flagpress()
        .args(["compile", "demos/web.toml", "--fingerprint"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(again).unwrap().trim(), fp);
}

#[test]
fn compile_fingerprint_json_output() {
    flagpress()
        .args(["--output", "json", "compile", "demos/web.toml", "--fingerprint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"etag\""));
}

#[test]
fn compile_legacy_keeps_comparison_text() {
    flagpress()
        .args(["compile", "demos/web.toml", "--legacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"c\": \"ana@example.com,bo@example.com\"",
        ));
}

#[test]
fn compile_legacy_fails_for_newer_comparators() {
    flagpress()
        .args(["compile", "demos/mobile.json", "--legacy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("new_onboarding"));
}

#[test]
fn compile_invalid_default_exits_1_naming_flag() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{"broken_flag": {"default": [1, 2]}}"#);
    flagpress()
        .arg("compile")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("broken_flag"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn compile_error_json_output() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bad.toml",
        r#"
        [greeting]
        default = "hi"

        [[greeting.rules]]
        attribute = "Country"
        comparator = "isOneOf"
        comparison_value = "NL"
        value = 3
        "#,
    );
    let output = flagpress()
        .args(["--output", "json", "compile"])
        .arg(&path)
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let err: serde_json::Value = serde_json::from_slice(&output).expect("JSON error");
    assert_eq!(err["flag"], "greeting");
    assert_eq!(err["rule"], 0);
    assert_eq!(err["field"], "value");
}

#[test]
fn compile_unknown_comparator_fails() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bad.json",
        r#"{"f": {"default": true, "rules": [
            {"attribute": "A", "comparator": 99, "comparison_value": "x", "value": false}
        ]}}"#,
    );
    flagpress()
        .arg("compile")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid comparator"));
}

#[test]
fn compile_missing_file_exits_1() {
    flagpress()
        .args(["compile", "demos/nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn quiet_suppresses_text_errors() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{"x": {"default": null}}"#);
    flagpress()
        .args(["--quiet", "compile"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

#[test]
fn quiet_suppresses_json_errors() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{"x": {"default": null}}"#);
    flagpress()
        .args(["--quiet", "--output", "json", "compile"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());

    flagpress()
        .args(["--quiet", "--output", "json", "check"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. Check
// ──────────────────────────────────────────────

#[test]
fn check_prints_summary() {
    flagpress()
        .args(["check", "demos/web.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 flags, 4 rules"))
        .stdout(predicate::str::contains("max_upload_mb (int, 1 rules)"));
}

#[test]
fn check_notes_legacy_gap() {
    flagpress()
        .args(["check", "demos/mobile.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not representable as config_v5.json"));
}

#[test]
fn check_json_output() {
    let output = flagpress()
        .args(["--output", "json", "check", "demos/mobile.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["valid"], true);
    assert_eq!(summary["legacy"], false);
    assert_eq!(summary["flags"][1]["type"], "float");
}

#[test]
fn check_served_type_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "mix.json",
        r#"{"limit": {"default": 1, "rules": [
            {"attribute": "Plan", "comparator": "isOneOf", "comparison_value": "pro", "value": 1.5}
        ]}}"#,
    );
    flagpress()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit"))
        .stderr(predicate::str::contains("need int"));
}

// ──────────────────────────────────────────────
// 4. Validate
// ──────────────────────────────────────────────

#[test]
fn validate_compiled_document_exits_0() {
    let doc = flagpress()
        .args(["compile", "demos/web.toml"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config_v6.json");
    fs::write(&path, doc).unwrap();

    flagpress()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_rejects_bad_layout() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{"f": {"x": {"v": true, "t": 0, "i": "v_x"}}}"#);
    flagpress()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid document"));
}

#[test]
fn validate_rejects_type_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{"f": {"x": {"v": {"s": "on"}, "t": 0, "i": "v_x"}}}"#);
    flagpress()
        .args(["--output", "json", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"valid\": false"));
}

#[test]
fn validate_invalid_json_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", "{");
    flagpress()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error parsing JSON"));
}

// ──────────────────────────────────────────────
// 5. Serve argument errors
// ──────────────────────────────────────────────

#[test]
fn serve_rejects_malformed_distribution() {
    flagpress()
        .args(["serve", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=FLAGS_FILE"));
}

#[test]
fn serve_refuses_to_start_with_invalid_flags() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.json", r#"{"x": {"default": {}}}"#);
    flagpress()
        .args(["serve", "--port", "0"])
        .arg(format!("sdk={}", path.display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("distribution 'sdk'"));
}
