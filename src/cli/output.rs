//! output formatting utilities for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;

use crate::conditions::{Condition, ConditionReferences};
use crate::resolver::DisplayInfo;

/// JSON-RPC version constant
const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// error code (condctl exit code, offset by -32000 for app-specific errors)
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// additional error data
#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl JsonRpcError {
    /// create error with standard JSON-RPC error code range
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_suggestions(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let mut error = Self::new(code, message);
        if !suggestions.is_empty() {
            error.error.data = Some(ErrorData {
                suggestions: Some(suggestions),
                details: None,
            });
        }
        error
    }

    pub fn with_details(code: i32, message: impl Into<String>, details: impl Into<String>) -> Self {
        let mut error = Self::new(code, message);
        error.error.data = Some(ErrorData {
            suggestions: None,
            details: Some(details.into()),
        });
        error
    }
}

/// convert condctl exit code to JSON-RPC error code
/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures for each command
// ============================================================================

/// result of `condctl check`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckData {
    pub complete: bool,
    pub empty: bool,
    pub submittable: bool,
    pub incomplete_count: usize,
    pub depth: usize,
    pub max_depth: usize,
    pub depth_exceeded: bool,
}

/// result of `condctl show`
#[derive(Serialize)]
pub struct ShowData<'a> {
    pub text: String,
    pub condition: &'a Condition,
}

/// result of `condctl link-key build|parse`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkKeyData {
    pub key: String,
    pub link_type_id: String,
    pub position: &'static str,
}

/// result of `condctl resolve`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveData {
    pub references: ConditionReferences,
    pub display_info: DisplayInfo,
    /// id -> label for every referenced id, raw id when unresolved
    pub labels: BTreeMap<String, String>,
}

// ============================================================================
// Output functions
// ============================================================================

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(code: i32, message: &str) {
    let error = JsonRpcError::new(code, message);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// print JSON-RPC error with suggestions
pub fn print_json_error_with_suggestions(code: i32, message: &str, suggestions: Vec<String>) {
    let error = JsonRpcError::with_suggestions(code, message, suggestions);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// print JSON-RPC error with a details string
pub fn print_json_error_with_details(code: i32, message: &str, details: &str) {
    let error = JsonRpcError::with_details(code, message, details);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}

/// report an error in the active output mode and exit with `code`
pub fn exit_with_error(mode: OutputMode, code: i32, message: &str, suggestions: Vec<String>) -> ! {
    if mode.is_json() {
        print_json_error_with_suggestions(code, message, suggestions);
    } else {
        eprintln!("error: {}", message);
        if !suggestions.is_empty() {
            eprintln!("  did you mean: {}", suggestions.join(", "));
        }
    }
    std::process::exit(code);
}
