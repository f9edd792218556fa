// integration tests for the check command

use crate::common::*;

#[test]
fn test_check_complete_condition_succeeds() {
    let test_dir = create_test_dir(&unique_test_name("check_complete"));
    let config_path = test_dir.join("config.json");
    let input = write_condition(&test_dir, "condition.json", COMPLETE_CONDITION);

    let output = run_condctl(&["--json", "check", input.to_str().unwrap()], &config_path);
    assert!(
        output.status.success(),
        "check failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = parse_json_output(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["complete"], true);
    assert_eq!(json["result"]["submittable"], true);
    assert_eq!(json["result"]["incompleteCount"], 0);
    assert_eq!(json["result"]["depth"], 2);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_incomplete_condition_exits_2() {
    let test_dir = create_test_dir(&unique_test_name("check_incomplete"));
    let config_path = test_dir.join("config.json");
    let input = write_condition(&test_dir, "condition.json", INCOMPLETE_CONDITION);

    let output = run_condctl(&["--json", "check", input.to_str().unwrap()], &config_path);
    assert_eq!(output.status.code(), Some(2));

    let json = parse_json_output(&output);
    assert_eq!(json["result"]["complete"], false);
    assert_eq!(json["result"]["submittable"], false);
    // one blank text value, one empty group
    assert_eq!(json["result"]["incompleteCount"], 2);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_reads_stdin() {
    let test_dir = create_test_dir(&unique_test_name("check_stdin"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(&["--no-json", "check"], &config_path, COMPLETE_CONDITION);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Condition is complete"), "stdout={}", stdout);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_empty_root_group_is_submittable() {
    let test_dir = create_test_dir(&unique_test_name("check_empty"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(
        &["--json", "check"],
        &config_path,
        r#"{ "root": { "nodeType": "GROUP", "operator": "AND", "children": [] } }"#,
    );
    assert!(output.status.success());

    let json = parse_json_output(&output);
    assert_eq!(json["result"]["empty"], true);
    assert_eq!(json["result"]["complete"], false);
    assert_eq!(json["result"]["submittable"], true);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_no_filter_is_submittable() {
    let test_dir = create_test_dir(&unique_test_name("check_no_filter"));
    let config_path = test_dir.join("config.json");

    for input in ["{}", "null", r#"{ "root": null }"#] {
        let output = run_condctl_with_stdin(&["--json", "check"], &config_path, input);
        assert!(output.status.success(), "input {} should pass", input);

        let json = parse_json_output(&output);
        assert_eq!(json["result"]["complete"], true);
        assert_eq!(json["result"]["depth"], 0);
    }

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_max_depth_flag() {
    let test_dir = create_test_dir(&unique_test_name("check_depth"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(
        &["--json", "check", "--max-depth", "1"],
        &config_path,
        COMPLETE_CONDITION,
    );
    assert_eq!(output.status.code(), Some(2));

    let json = parse_json_output(&output);
    assert_eq!(json["result"]["complete"], true);
    assert_eq!(json["result"]["depthExceeded"], true);
    assert_eq!(json["result"]["maxDepth"], 1);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_depth_limit_from_config() {
    let test_dir = create_test_dir(&unique_test_name("check_depth_config"));
    let config_path = test_dir.join("config.json");
    std::fs::write(&config_path, r#"{ "editor": { "max_group_depth": 1 } }"#).unwrap();

    let output = run_condctl_with_stdin(&["--json", "check"], &config_path, COMPLETE_CONDITION);
    assert_eq!(output.status.code(), Some(2));

    let json = parse_json_output(&output);
    assert_eq!(json["result"]["depthExceeded"], true);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_unknown_node_type_is_parse_error() {
    let test_dir = create_test_dir(&unique_test_name("check_parse_error"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(
        &["--json", "check"],
        &config_path,
        r#"{ "root": { "nodeType": "GROUP", "children": [ { "nodeType": "NUMBR" } ] } }"#,
    );
    assert_eq!(output.status.code(), Some(3));

    let json = parse_json_output(&output);
    assert_eq!(json["error"]["code"], -32003);
    assert_eq!(json["error"]["data"]["details"], "root.children[0]");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("did you mean 'NUMBER'"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_malformed_subject_is_incomplete() {
    let test_dir = create_test_dir(&unique_test_name("check_bad_subject"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(
        &["--json", "check"],
        &config_path,
        r#"{ "root": { "nodeType": "GROUP", "children": [
            { "nodeType": "DATE", "subject": { "fieldId": "due" }, "operator": { "type": "IS_EMPTY" } },
            { "nodeType": "STATUS", "subject": null, "operator": { "type": "EQ", "statusId": "s1" } }
        ] } }"#,
    );
    assert_eq!(output.status.code(), Some(2));

    let json = parse_json_output(&output);
    assert_eq!(json["result"]["complete"], false);
    assert_eq!(json["result"]["incompleteCount"], 2);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_nested_group_error_points_at_node() {
    let test_dir = create_test_dir(&unique_test_name("check_nested_error"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(
        &["--json", "check"],
        &config_path,
        r#"{ "root": { "nodeType": "GROUP", "children": [
            { "nodeType": "GROUP", "operator": "AND" },
            { "nodeType": "GROUP", "children": "none" }
        ] } }"#,
    );
    assert_eq!(output.status.code(), Some(3));

    let json = parse_json_output(&output);
    assert_eq!(json["error"]["data"]["details"], "root.children[1]");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_invalid_json_is_parse_error() {
    let test_dir = create_test_dir(&unique_test_name("check_syntax"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(&["--no-json", "check"], &config_path, "{ root: ");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr.contains("invalid JSON"), "stderr={}", stderr);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_missing_file_fails() {
    let test_dir = create_test_dir(&unique_test_name("check_missing"));
    let config_path = test_dir.join("config.json");
    let missing = test_dir.join("missing.json");

    let output = run_condctl(&["check", missing.to_str().unwrap()], &config_path);
    assert_eq!(output.status.code(), Some(1));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_missing_file_reports_json_error() {
    let test_dir = create_test_dir(&unique_test_name("check_missing_json"));
    let config_path = test_dir.join("config.json");
    let missing = test_dir.join("missing.json");

    let output = run_condctl(&["--json", "check", missing.to_str().unwrap()], &config_path);
    assert_eq!(output.status.code(), Some(1));

    let json = parse_json_output(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["error"]["code"], -32001);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("missing.json"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_check_quiet_prints_nothing() {
    let test_dir = create_test_dir(&unique_test_name("check_quiet"));
    let config_path = test_dir.join("config.json");

    let output = run_condctl_with_stdin(&["--quiet", "check"], &config_path, INCOMPLETE_CONDITION);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    cleanup_test_dir(&test_dir);
}
