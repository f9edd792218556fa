// integration tests for the show, refs and resolve commands

use crate::common::*;
use std::fs;

#[test]
fn test_show_renders_one_line() {
    let test_dir = create_test_dir(&unique_test_name("show_text"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(&["--no-json", "show"], &config_path, COMPLETE_CONDITION);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(
        stdout.trim(),
        "(TEXT[f-title] CONTAINS \"launch\" AND ENUM[f-priority] IN [o-high, o-urgent] AND \
         (STATUS[vs-1] REACHED st-review OR via(lt-parent:TARGET) LINK[lt-blocks:SOURCE] IN [c-7]))"
    );

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_show_pretty_drops_empty_paths() {
    let test_dir = create_test_dir(&unique_test_name("show_pretty"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(
        &["--no-json", "show", "--pretty"],
        &config_path,
        r#"{ nodeType: "WEB_URL", subject: { fieldId: "u1", path: { linkNodes: [] } }, operator: { type: "IS_EMPTY" } }"#,
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["root"]["nodeType"], "WEB_URL");
    assert!(json["root"]["subject"].get("path").is_none());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_show_json_includes_text_and_condition() {
    let test_dir = create_test_dir(&unique_test_name("show_json"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(&["--json", "show"], &config_path, "{}");
    let json = parse_json_output(&output);

    assert_eq!(json["result"]["text"], "<no filter>");
    assert!(json["result"]["condition"].get("root").is_none());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_refs_collects_every_id() {
    let test_dir = create_test_dir(&unique_test_name("refs"));
    let config_path = test_dir.join("config.json");
    let input = write_condition(&test_dir, "condition.json", COMPLETE_CONDITION);

    let output = run_condctl(&["--json", "refs", input.to_str().unwrap()], &config_path);
    assert!(output.status.success());

    let refs = &parse_json_output(&output)["result"];
    assert_eq!(
        refs["fieldIds"],
        serde_json::json!(["f-priority", "f-title"])
    );
    assert_eq!(
        refs["linkFieldIds"],
        serde_json::json!(["lt-blocks:SOURCE", "lt-parent:TARGET"])
    );
    assert_eq!(
        refs["enumOptionIds"]["f-priority"],
        serde_json::json!(["o-high", "o-urgent"])
    );
    assert_eq!(refs["cardIds"], serde_json::json!(["c-7"]));
    assert_eq!(refs["statusIds"], serde_json::json!(["st-review"]));
    assert_eq!(refs["streamIds"], serde_json::json!(["vs-1"]));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_refs_text_for_empty_condition() {
    let test_dir = create_test_dir(&unique_test_name("refs_empty"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(&["--no-json", "refs"], &config_path, "null");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout.trim(), "No references");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_resolve_without_root_skips_request() {
    let test_dir = create_test_dir(&unique_test_name("resolve_no_root"));
    let config_path = test_dir.join("config.json");

    // nothing listens here; a request would fail with exit code 6
    let output = run_condctl_with_stdin(
        &["--no-json", "resolve", "--base-url", "http://127.0.0.1:9"],
        &config_path,
        "{}",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr={}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout.trim(), "No ids to resolve");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_resolve_unreachable_backend_exits_6() {
    let test_dir = create_test_dir(&unique_test_name("resolve_unreachable"));
    let config_path = test_dir.join("config.json");
    fs::write(
        &config_path,
        r#"{ "resolver": { "base_url": "http://127.0.0.1:9", "timeout_secs": 2 } }"#,
    )
    .unwrap();

    let output = run_condctl_with_stdin(&["--json", "resolve"], &config_path, COMPLETE_CONDITION);
    assert_eq!(output.status.code(), Some(6));

    let json = parse_json_output(&output);
    assert_eq!(json["error"]["code"], -32006);

    cleanup_test_dir(&test_dir);
}
