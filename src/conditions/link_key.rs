//! composite link-field keys: `"{linkTypeId}:{SOURCE|TARGET}"`
//!
//! the same string identifies a LINK subject, every hop of a path and the
//! keys of the resolver's link-field name map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEPARATOR: char = ':';

/// which end of a link type a field represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkPosition {
    Source,
    Target,
}

impl LinkPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkPosition::Source => "SOURCE",
            LinkPosition::Target => "TARGET",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SOURCE" => Some(LinkPosition::Source),
            "TARGET" => Some(LinkPosition::Target),
            _ => None,
        }
    }
}

impl fmt::Display for LinkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// reasons a string is not a composite link-field key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkKeyError {
    #[error("link field id '{0}' has no ':' separator")]
    MissingSeparator(String),
    #[error("link field id '{0}' has an empty link type id")]
    EmptyLinkTypeId(String),
    #[error("link field id '{key}' has unknown position '{position}' (expected SOURCE or TARGET)")]
    UnknownPosition { key: String, position: String },
}

/// decoded composite link-field key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkFieldKey {
    pub link_type_id: String,
    pub position: LinkPosition,
}

impl LinkFieldKey {
    pub fn new(link_type_id: impl Into<String>, position: LinkPosition) -> Self {
        Self {
            link_type_id: link_type_id.into(),
            position,
        }
    }
}

impl fmt::Display for LinkFieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.link_type_id, SEPARATOR, self.position)
    }
}

impl FromStr for LinkFieldKey {
    type Err = LinkKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_link_field_id(s)
    }
}

/// build the composite key for one end of a link type
pub fn build_link_field_id(link_type_id: &str, position: LinkPosition) -> String {
    LinkFieldKey::new(link_type_id, position).to_string()
}

/// split a composite key into link type id and position
///
/// splits on the last separator, so link type ids may contain `:` themselves.
pub fn parse_link_field_id(key: &str) -> Result<LinkFieldKey, LinkKeyError> {
    let (link_type_id, position) = key
        .rsplit_once(SEPARATOR)
        .ok_or_else(|| LinkKeyError::MissingSeparator(key.to_string()))?;

    if link_type_id.trim().is_empty() {
        return Err(LinkKeyError::EmptyLinkTypeId(key.to_string()));
    }

    let position = LinkPosition::parse(position).ok_or_else(|| LinkKeyError::UnknownPosition {
        key: key.to_string(),
        position: position.to_string(),
    })?;

    Ok(LinkFieldKey::new(link_type_id, position))
}
