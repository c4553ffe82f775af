//! Grammar checks and failure envelopes under `--output json`.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn shellkit() -> Command {
    Command::new(cargo::cargo_bin!("shellkit"))
}

fn write_temp_grammar(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grammar.jsonc");
    fs::write(&path, content).expect("write temp grammar");
    (dir, path.to_string_lossy().to_string())
}

fn envelope(output: &std::process::Output) -> serde_json::Value {
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json envelope");
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "command_failed");
    json
}

#[test]
fn check_reports_counts_for_valid_grammar() {
    let (_dir, path) = write_temp_grammar(
        r#"{
  /* two types, one command */
  "ptypes": [
    {"name": "UINT", "method": "unsignedInteger"},
    {"name": "WORD", "method": "regexp", "pattern": "[a-z]+"}
  ],
  "commands": [{"name": "ping", "params": [{"name": "count", "ptype": "UINT"}]}]
}"#,
    );
    let output = shellkit()
        .args(["check", "--grammar", &path, "--output", "json"])
        .output()
        .expect("run check");
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json output");
    assert_eq!(json["ok"], true);
    assert_eq!(json["commands"], 1);
    assert_eq!(json["ptypes"], 2);
}

#[test]
fn missing_grammar_file_emits_envelope() {
    let output = shellkit()
        .args(["check", "--grammar", "nope-does-not-exist.jsonc", "--output", "json"])
        .output()
        .expect("run check");
    let json = envelope(&output);
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to read grammar file")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn malformed_json_emits_envelope() {
    let (_dir, path) = write_temp_grammar("{\n  \"commands\": [\n    {\"name\": }\n  ]\n}\n");
    let output = shellkit()
        .args(["check", "-g", &path, "--output", "json"])
        .output()
        .expect("run check");
    let json = envelope(&output);
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("invalid grammar") && m.contains("line 3")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn malformed_json_is_rendered_with_source_in_pretty_mode() {
    let (_dir, path) = write_temp_grammar("{\n  \"commands\": [\n    {\"name\": }\n  ]\n}\n");
    let output = shellkit()
        .args(["check", "-g", &path, "--output", "pretty"])
        .output()
        .expect("run check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid grammar JSON"), "stderr: {stderr}");
    assert!(stderr.contains("grammar.jsonc"), "stderr: {stderr}");
}

#[test]
fn unknown_ptype_emits_envelope_from_parse() {
    let (_dir, path) = write_temp_grammar(
        r#"{"commands": [{"name": "ping", "params": [{"name": "host", "ptype": "HOST"}]}]}"#,
    );
    let output = shellkit()
        .args(["parse", "--grammar", &path, "--output", "json", "ping x"])
        .output()
        .expect("run parse");
    let json = envelope(&output);
    assert!(
        json["message"].as_str().is_some_and(|m| m.contains("HOST")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn malformed_var_is_a_usage_error() {
    let (_dir, path) = write_temp_grammar(r#"{"commands": []}"#);
    let output = shellkit()
        .args(["parse", "--grammar", &path, "--var", "novalue", "x"])
        .output()
        .expect("run parse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NAME=VALUE"), "stderr: {stderr}");
}

#[test]
fn bundled_demo_grammar_checks_clean() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../grammars/demo.jsonc");
    let output = shellkit()
        .args(["check", "--output", "json", "--grammar"])
        .arg(&path)
        .output()
        .expect("run check");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json output");
    assert_eq!(json["commands"], 5);
}
