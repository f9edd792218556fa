// shared utilities for integration tests

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

// counter for unique test directory names
static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// create a unique test directory name
pub fn unique_test_name(prefix: &str) -> String {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}_{}_{}", prefix, std::process::id(), count)
}

/// create a temporary directory for test files
pub fn create_test_dir(name: &str) -> PathBuf {
    let base = env::temp_dir().join("condctl_integration_tests");
    let dir = base.join(name);

    // clean up if exists
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }

    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

/// clean up a test directory
pub fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// write a condition document into `dir`
pub fn write_condition(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write condition file");
    path
}

/// path to the condctl binary built by cargo for this test run
pub fn condctl_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_condctl"))
}

fn condctl_command(args: &[&str], config_path: &Path) -> Command {
    let mut cmd = Command::new(condctl_binary_path());
    cmd.arg("--config")
        .arg(config_path)
        .args(args)
        .env_remove("CONDCTL_CONFIG")
        .env_remove("CONDCTL_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// run condctl against an isolated config file and capture output
pub fn run_condctl(args: &[&str], config_path: &Path) -> Output {
    condctl_command(args, config_path)
        .output()
        .expect("Failed to run condctl")
}

/// run condctl with `input` on stdin
pub fn run_condctl_with_stdin(args: &[&str], config_path: &Path, input: &str) -> Output {
    let mut child = condctl_command(args, config_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn condctl");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for condctl")
}

/// parse the JSON-RPC envelope printed on stdout
pub fn parse_json_output(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): stdout={}, stderr={}",
            e,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

pub const COMPLETE_CONDITION: &str = r#"{
    "root": {
        "nodeType": "GROUP",
        "operator": "AND",
        "children": [
            {
                "nodeType": "TEXT",
                "subject": { "fieldId": "f-title" },
                "operator": { "type": "CONTAINS", "value": "launch" }
            },
            {
                "nodeType": "ENUM",
                "subject": { "fieldId": "f-priority" },
                "operator": { "type": "IN", "optionIds": ["o-high", "o-urgent"] }
            },
            {
                "nodeType": "GROUP",
                "operator": "OR",
                "children": [
                    {
                        "nodeType": "STATUS",
                        "subject": { "streamId": "vs-1" },
                        "operator": { "type": "REACHED", "statusId": "st-review" }
                    },
                    {
                        "nodeType": "LINK",
                        "subject": {
                            "linkFieldId": "lt-blocks:SOURCE",
                            "path": { "linkNodes": ["lt-parent:TARGET"] }
                        },
                        "operator": { "type": "IN", "value": { "type": "STATIC", "cardIds": ["c-7"] } }
                    }
                ]
            }
        ]
    }
}"#;

pub const INCOMPLETE_CONDITION: &str = r#"{
    "root": {
        "nodeType": "GROUP",
        "operator": "AND",
        "children": [
            {
                "nodeType": "TEXT",
                "subject": { "fieldId": "f-title" },
                "operator": { "type": "CONTAINS", "value": "" }
            },
            {
                "nodeType": "NUMBER",
                "subject": { "fieldId": "f-estimate" },
                "operator": { "type": "GT", "value": { "type": "STATIC", "value": 3 } }
            },
            { "nodeType": "GROUP", "operator": "OR", "children": [] }
        ]
    }
}"#;
