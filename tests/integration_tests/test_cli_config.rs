// integration tests for the config command

use crate::common::*;
use std::fs;

// ============================================================================
// config path / show tests
// ============================================================================

#[test]
fn test_config_path_honors_flag() {
    let test_dir = create_test_dir(&unique_test_name("config_path"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl(&["config", "path"], &config_path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout.trim(), config_path.to_str().unwrap());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    let test_dir = create_test_dir(&unique_test_name("config_show_default"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl(&["config", "show"], &config_path);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["editor"]["max_group_depth"], 3);
    assert_eq!(json["editor"]["default_group_operator"], "AND");
    assert_eq!(json["resolver"]["timeout_secs"], 30);

    // show never writes the file
    assert!(!config_path.exists());

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// config set / reset tests
// ============================================================================

#[test]
fn test_config_set_persists_value() {
    let test_dir = create_test_dir(&unique_test_name("config_set"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl(
        &["--no-json", "config", "set", "editor.max_group_depth", "5"],
        &config_path,
    );
    assert!(
        output.status.success(),
        "set failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs::read_to_string(&config_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["editor"]["max_group_depth"], 5);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_set_unknown_key_is_invalid_args() {
    let test_dir = create_test_dir(&unique_test_name("config_set_unknown"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl(&["--no-json", "config", "set", "editor.theme", "dark"], &config_path);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr.contains("Unknown config key"), "stderr={}", stderr);
    assert!(!config_path.exists());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_reset_restores_defaults() {
    let test_dir = create_test_dir(&unique_test_name("config_reset"));
    let config_path = test_dir.join("config.json");
    fs::write(&config_path, r#"{ "editor": { "max_group_depth": 9 } }"#).unwrap();

    let output = run_condctl(&["--no-json", "config", "reset"], &config_path);
    assert!(output.status.success());

    let content = fs::read_to_string(&config_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["editor"]["max_group_depth"], 3);

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// config verify tests
// ============================================================================

#[test]
fn test_config_verify_valid_file() {
    let test_dir = create_test_dir(&unique_test_name("config_verify_ok"));
    let config_path = test_dir.join("config.json");
    fs::write(
        &config_path,
        r#"{
            // JSON5 comments are fine
            resolver: { base_url: "https://cards.example.com/api", timeout_secs: 10 },
            editor: { max_group_depth: 4 },
        }"#,
    )
    .unwrap();

    let output = run_condctl(&["--no-json", "config", "verify"], &config_path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout={}", stdout);
    assert!(stdout.contains("Configuration is valid"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_verify_reports_errors() {
    let test_dir = create_test_dir(&unique_test_name("config_verify_errors"));
    let config_path = test_dir.join("config.json");
    fs::write(
        &config_path,
        r#"{ "resolver": { "base_url": "cards.example.com" }, "editor": { "max_group_depth": 0 } }"#,
    )
    .unwrap();

    let output = run_condctl(&["--json", "config", "verify"], &config_path);
    assert_eq!(output.status.code(), Some(5));

    let json = parse_json_output(&output);
    assert_eq!(json["result"]["valid"], false);
    assert_eq!(json["result"]["errors"].as_array().unwrap().len(), 2);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_verify_missing_file() {
    let test_dir = create_test_dir(&unique_test_name("config_verify_missing"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl(&["--no-json", "config", "verify"], &config_path);
    assert_eq!(output.status.code(), Some(5));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_broken_config_is_config_error() {
    let test_dir = create_test_dir(&unique_test_name("config_broken"));
    let config_path = test_dir.join("config.json");
    fs::write(&config_path, "{ editor: ").unwrap();

    let output = run_condctl_with_stdin(&["--json", "check"], &config_path, COMPLETE_CONDITION);
    assert_eq!(output.status.code(), Some(5));

    let json = parse_json_output(&output);
    assert_eq!(json["error"]["code"], -32005);

    cleanup_test_dir(&test_dir);
}
