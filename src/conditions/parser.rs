//! condition parser - converts JSON text to a condition tree
//!
//! accepts:
//! - JSON5 (comments, trailing commas, unquoted keys)
//! - a wrapped condition: `{ "root": { ... } }`
//! - a bare node: any object carrying `nodeType`
//! - `{}`, `null` or `{ "root": null }` for "no filter"
//!
//! nodes are decoded one at a time so errors point at the offending node
//! (e.g. `root.children[2]`). problems inside an item's subject or operator
//! never fail the parse, they only make the item incomplete.

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::types::{
    is_group_node_value, Condition, ConditionGroup, ConditionItem, ConditionNode, GroupOperator,
    NodeType,
};

/// error type for parsing conditions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// input is not valid JSON5
    #[error("invalid JSON: {0}")]
    Syntax(String),
    /// a node does not have a recognizable shape
    #[error("{path}: {message}")]
    Shape { message: String, path: String },
}

impl ParseError {
    fn shape(message: impl Into<String>, path: impl Into<String>) -> Self {
        ParseError::Shape {
            message: message.into(),
            path: path.into(),
        }
    }
}

/// parse condition text into a tree
pub fn parse_condition(input: &str) -> Result<Condition, ParseError> {
    let json: JsonValue =
        json5::from_str(input).map_err(|e| ParseError::Syntax(e.to_string()))?;
    parse_condition_value(&json)
}

/// parse an already-decoded JSON value into a tree
pub fn parse_condition_value(json: &JsonValue) -> Result<Condition, ParseError> {
    let root = match json {
        JsonValue::Null => return Ok(Condition::default()),
        JsonValue::Object(obj) if obj.contains_key("root") => &obj["root"],
        JsonValue::Object(obj) if obj.contains_key("nodeType") => json,
        JsonValue::Object(obj) if obj.is_empty() => return Ok(Condition::default()),
        JsonValue::Object(_) => {
            return Err(ParseError::shape(
                "expected a condition with 'root' or a node with 'nodeType'",
                "",
            ))
        }
        other => {
            return Err(ParseError::shape(
                format!("expected object, got {}", describe(other)),
                "",
            ))
        }
    };

    if root.is_null() {
        return Ok(Condition::default());
    }

    let mut condition = Condition {
        root: Some(decode_node(root, "root")?),
    };
    condition.normalize();
    Ok(condition)
}

fn decode_node(json: &JsonValue, path: &str) -> Result<ConditionNode, ParseError> {
    let obj = json.as_object().ok_or_else(|| {
        ParseError::shape(format!("expected node object, got {}", describe(json)), path)
    })?;

    let node_type = obj
        .get("nodeType")
        .ok_or_else(|| ParseError::shape("missing 'nodeType'", path))?
        .as_str()
        .ok_or_else(|| ParseError::shape("'nodeType' must be a string", path))?;

    if is_group_node_value(json) {
        return decode_group(obj, path).map(ConditionNode::Group);
    }

    if NodeType::ALL.iter().all(|kind| kind.as_str() != node_type) {
        let suggestions = NodeType::suggest(node_type, 2);
        let message = match suggestions.first() {
            Some(best) => format!("unknown nodeType '{}' (did you mean '{}'?)", node_type, best),
            None => format!("unknown nodeType '{}'", node_type),
        };
        return Err(ParseError::shape(message, path));
    }

    // subject and operator decode leniently, so only the envelope can fail here
    let item: ConditionItem = serde_json::from_value(json.clone())
        .map_err(|e| ParseError::shape(e.to_string(), path))?;
    Ok(ConditionNode::Item(item))
}

fn decode_group(
    obj: &serde_json::Map<String, JsonValue>,
    path: &str,
) -> Result<ConditionGroup, ParseError> {
    let operator = match obj.get("operator") {
        None => GroupOperator::default(),
        Some(op) => serde_json::from_value(op.clone()).map_err(|_| {
            ParseError::shape(
                format!("group operator must be \"AND\" or \"OR\", got {}", op),
                path,
            )
        })?,
    };

    let children = match obj.get("children") {
        None | Some(JsonValue::Null) => return Ok(ConditionGroup::new(operator)),
        Some(JsonValue::Array(children)) => children,
        Some(other) => {
            return Err(ParseError::shape(
                format!("'children' must be an array, got {}", describe(other)),
                path,
            ))
        }
    };

    let mut group = ConditionGroup::new(operator);
    for (i, child) in children.iter().enumerate() {
        group.push(decode_node(child, &format!("{}.children[{}]", path, i))?);
    }
    Ok(group)
}

fn describe(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
