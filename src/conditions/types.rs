//! core types for the condition tree
//!
//! a `Condition` wraps an optional root node; a node is either a boolean
//! group or a typed leaf item. subjects and operators are closed sum types
//! per item kind, so every consumer matches them exhaustively.
//!
//! the shapes are deliberately permissive about *values* (an item may hold
//! `fieldId: ""` or an operator without its comparison value) because that
//! is exactly the transient state an editor needs to hold. whether a tree is
//! fully specified is answered by `validate`, not by the types.

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::key_date::KeyDate;

/// discriminant used for group nodes on the wire
pub const GROUP_NODE_TYPE: &str = "GROUP";

// ============================================================================
// Kinds and operator types
// ============================================================================

/// the kind of a leaf item (the `nodeType` discriminant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Text,
    Title,
    Code,
    Number,
    Date,
    Enum,
    Status,
    WebUrl,
    Link,
    CardCycle,
    CreatedBy,
    UpdatedBy,
}

impl NodeType {
    pub const ALL: [NodeType; 12] = [
        NodeType::Text,
        NodeType::Title,
        NodeType::Code,
        NodeType::Number,
        NodeType::Date,
        NodeType::Enum,
        NodeType::Status,
        NodeType::WebUrl,
        NodeType::Link,
        NodeType::CardCycle,
        NodeType::CreatedBy,
        NodeType::UpdatedBy,
    ];

    /// wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Text => "TEXT",
            NodeType::Title => "TITLE",
            NodeType::Code => "CODE",
            NodeType::Number => "NUMBER",
            NodeType::Date => "DATE",
            NodeType::Enum => "ENUM",
            NodeType::Status => "STATUS",
            NodeType::WebUrl => "WEB_URL",
            NodeType::Link => "LINK",
            NodeType::CardCycle => "CARD_CYCLE",
            NodeType::CreatedBy => "CREATED_BY",
            NodeType::UpdatedBy => "UPDATED_BY",
        }
    }

    /// parse a kind from its wire name (case-insensitive, `-` accepted for `_`)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        NodeType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
    }

    /// closest known kind names for a mistyped input, best match first
    pub fn suggest(s: &str, max_distance: usize) -> Vec<&'static str> {
        let query = s.trim().to_ascii_uppercase();
        let mut matches: Vec<_> = NodeType::ALL
            .iter()
            .map(|kind| (kind.as_str(), strsim::levenshtein(&query, kind.as_str())))
            .filter(|(_, distance)| *distance <= max_distance)
            .collect();
        matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// the fixed operator set legal for this kind
    pub fn operator_types(&self) -> &'static [OperatorType] {
        use OperatorType::*;
        match self {
            NodeType::Text | NodeType::Title | NodeType::Code => &[
                Contains,
                NotContains,
                StartsWith,
                EndsWith,
                Eq,
                Ne,
                IsEmpty,
                IsNotEmpty,
            ],
            NodeType::Number => &[Eq, Ne, Gt, Ge, Lt, Le, Between, IsEmpty, IsNotEmpty],
            NodeType::Date => &[Before, After, Eq, Between, IsEmpty, IsNotEmpty],
            NodeType::Enum => &[Eq, Ne, In, NotIn, IsEmpty, IsNotEmpty],
            NodeType::Status => &[Eq, Reached, NotReached, Passed, In, NotIn],
            NodeType::WebUrl => &[IsEmpty, IsNotEmpty],
            NodeType::Link => &[HasAny, IsEmpty, In, NotIn],
            NodeType::CardCycle => &[In],
            NodeType::CreatedBy | NodeType::UpdatedBy => {
                &[IsCurrentUser, IsNotCurrentUser, Eq, Ne, In, NotIn]
            }
        }
    }

    /// whether `op` belongs to this kind's operator set
    pub fn allows(&self, op: OperatorType) -> bool {
        self.operator_types().contains(&op)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// every operator name used by any kind, flattened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorType {
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Between,
    Before,
    After,
    In,
    NotIn,
    Reached,
    NotReached,
    Passed,
    HasAny,
    IsEmpty,
    IsNotEmpty,
    IsCurrentUser,
    IsNotCurrentUser,
}

impl OperatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorType::Contains => "CONTAINS",
            OperatorType::NotContains => "NOT_CONTAINS",
            OperatorType::StartsWith => "STARTS_WITH",
            OperatorType::EndsWith => "ENDS_WITH",
            OperatorType::Eq => "EQ",
            OperatorType::Ne => "NE",
            OperatorType::Gt => "GT",
            OperatorType::Ge => "GE",
            OperatorType::Lt => "LT",
            OperatorType::Le => "LE",
            OperatorType::Between => "BETWEEN",
            OperatorType::Before => "BEFORE",
            OperatorType::After => "AFTER",
            OperatorType::In => "IN",
            OperatorType::NotIn => "NOT_IN",
            OperatorType::Reached => "REACHED",
            OperatorType::NotReached => "NOT_REACHED",
            OperatorType::Passed => "PASSED",
            OperatorType::HasAny => "HAS_ANY",
            OperatorType::IsEmpty => "IS_EMPTY",
            OperatorType::IsNotEmpty => "IS_NOT_EMPTY",
            OperatorType::IsCurrentUser => "IS_CURRENT_USER",
            OperatorType::IsNotCurrentUser => "IS_NOT_CURRENT_USER",
        }
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Subjects
// ============================================================================

/// ordered hop-list of composite link-field keys leading to a related card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    #[serde(default)]
    pub link_nodes: Vec<String>,
}

impl Path {
    pub fn new(link_nodes: Vec<String>) -> Self {
        Self { link_nodes }
    }

    /// a path without hops means "the current card"
    pub fn is_empty(&self) -> bool {
        self.link_nodes.is_empty()
    }
}

/// drop a path that has no hops, so absent and empty compare equal
pub fn normalize_path(path: Option<Path>) -> Option<Path> {
    path.filter(|p| !p.is_empty())
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<Option<Path>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Path>::deserialize(deserializer).map(normalize_path)
}

/// decode an optional value, discarding (and logging) anything that does not
/// match the expected shape instead of failing the whole tree
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("ignoring unrecognized value {}: {}", raw, e);
            Ok(None)
        }
    }
}

/// like `lenient`, but a missing or unreadable value becomes `T::default()`
fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

/// common access to the optional path every subject may carry
pub trait Subject {
    fn path(&self) -> Option<&Path>;
    fn path_mut(&mut self) -> &mut Option<Path>;
}

/// subject of a user-defined field (TEXT, NUMBER, ENUM, WEB_URL)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSubject {
    #[serde(default)]
    pub field_id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Path>,
}

impl FieldSubject {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            path: None,
        }
    }
}

/// subject of a kind whose identity is implied by the node type
/// (TITLE, CODE, CARD_CYCLE, CREATED_BY, UPDATED_BY)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSubject {
    #[serde(
        default,
        deserialize_with = "deserialize_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Path>,
}

/// value-stream subject of a STATUS item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSubject {
    #[serde(default)]
    pub stream_id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Path>,
}

/// subject of a LINK item, keyed by a composite link-field key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSubject {
    #[serde(default)]
    pub link_field_id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Path>,
}

/// built-in card timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemDateField {
    CreatedAt,
    UpdatedAt,
    DiscardedAt,
    ArchivedAt,
}

impl SystemDateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemDateField::CreatedAt => "CREATED_AT",
            SystemDateField::UpdatedAt => "UPDATED_AT",
            SystemDateField::DiscardedAt => "DISCARDED_AT",
            SystemDateField::ArchivedAt => "ARCHIVED_AT",
        }
    }
}

/// subject of a DATE item: a built-in timestamp or a user-defined date field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateSubject {
    #[serde(rename_all = "camelCase")]
    System {
        #[serde(
            default,
            deserialize_with = "lenient",
            skip_serializing_if = "Option::is_none"
        )]
        system_field: Option<SystemDateField>,
        #[serde(
            default,
            deserialize_with = "deserialize_path",
            skip_serializing_if = "Option::is_none"
        )]
        path: Option<Path>,
    },
    #[serde(rename_all = "camelCase")]
    Field {
        #[serde(default)]
        field_id: String,
        #[serde(
            default,
            deserialize_with = "deserialize_path",
            skip_serializing_if = "Option::is_none"
        )]
        path: Option<Path>,
    },
}

impl Default for DateSubject {
    fn default() -> Self {
        DateSubject::Field {
            field_id: String::new(),
            path: None,
        }
    }
}

macro_rules! impl_subject {
    ($($ty:ty),*) => {
        $(
            impl Subject for $ty {
                fn path(&self) -> Option<&Path> {
                    self.path.as_ref()
                }

                fn path_mut(&mut self) -> &mut Option<Path> {
                    &mut self.path
                }
            }
        )*
    };
}

impl_subject!(FieldSubject, SystemSubject, StatusSubject, LinkSubject);

impl Subject for DateSubject {
    fn path(&self) -> Option<&Path> {
        match self {
            DateSubject::System { path, .. } | DateSubject::Field { path, .. } => path.as_ref(),
        }
    }

    fn path_mut(&mut self) -> &mut Option<Path> {
        match self {
            DateSubject::System { path, .. } | DateSubject::Field { path, .. } => path,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// comparison value of a NUMBER operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberValue {
    /// literal number
    Static {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// id of another number field on the same card
    Reference {
        #[serde(default)]
        value: String,
    },
}

/// comparison value of a DATE operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateValue {
    /// relative date token interpreted by the backend
    #[serde(rename_all = "camelCase")]
    KeyDate {
        #[serde(default)]
        key_date: KeyDate,
    },
    /// absolute ISO-8601 date or timestamp
    Specific {
        #[serde(default)]
        value: String,
    },
}

/// referenced cards of a LINK `IN`/`NOT_IN` operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkValue {
    #[serde(rename_all = "camelCase")]
    Static {
        #[serde(default)]
        card_ids: Vec<String>,
    },
}

impl LinkValue {
    pub fn card_ids(&self) -> &[String] {
        match self {
            LinkValue::Static { card_ids } => card_ids,
        }
    }
}

/// card lifecycle states consumed by CARD_CYCLE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardCycle {
    Active,
    Discarded,
    Archived,
}

impl CardCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardCycle::Active => "ACTIVE",
            CardCycle::Discarded => "DISCARDED",
            CardCycle::Archived => "ARCHIVED",
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// common access to the operator type of any kind's operator
pub trait Operator {
    fn operator_type(&self) -> OperatorType;
}

/// operator of TEXT, TITLE and CODE items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextOperator {
    Contains {
        #[serde(default)]
        value: String,
    },
    NotContains {
        #[serde(default)]
        value: String,
    },
    StartsWith {
        #[serde(default)]
        value: String,
    },
    EndsWith {
        #[serde(default)]
        value: String,
    },
    Eq {
        #[serde(default)]
        value: String,
    },
    Ne {
        #[serde(default)]
        value: String,
    },
    IsEmpty,
    IsNotEmpty,
}

impl TextOperator {
    /// comparison string, if this operator carries one
    pub fn value(&self) -> Option<&str> {
        match self {
            TextOperator::Contains { value }
            | TextOperator::NotContains { value }
            | TextOperator::StartsWith { value }
            | TextOperator::EndsWith { value }
            | TextOperator::Eq { value }
            | TextOperator::Ne { value } => Some(value),
            TextOperator::IsEmpty | TextOperator::IsNotEmpty => None,
        }
    }
}

impl Operator for TextOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            TextOperator::Contains { .. } => OperatorType::Contains,
            TextOperator::NotContains { .. } => OperatorType::NotContains,
            TextOperator::StartsWith { .. } => OperatorType::StartsWith,
            TextOperator::EndsWith { .. } => OperatorType::EndsWith,
            TextOperator::Eq { .. } => OperatorType::Eq,
            TextOperator::Ne { .. } => OperatorType::Ne,
            TextOperator::IsEmpty => OperatorType::IsEmpty,
            TextOperator::IsNotEmpty => OperatorType::IsNotEmpty,
        }
    }
}

/// operator of NUMBER items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberOperator {
    Eq {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<NumberValue>,
    },
    Ne {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<NumberValue>,
    },
    Gt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<NumberValue>,
    },
    Ge {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<NumberValue>,
    },
    Lt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<NumberValue>,
    },
    Le {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<NumberValue>,
    },
    Between {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<NumberValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<NumberValue>,
    },
    IsEmpty,
    IsNotEmpty,
}

impl Operator for NumberOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            NumberOperator::Eq { .. } => OperatorType::Eq,
            NumberOperator::Ne { .. } => OperatorType::Ne,
            NumberOperator::Gt { .. } => OperatorType::Gt,
            NumberOperator::Ge { .. } => OperatorType::Ge,
            NumberOperator::Lt { .. } => OperatorType::Lt,
            NumberOperator::Le { .. } => OperatorType::Le,
            NumberOperator::Between { .. } => OperatorType::Between,
            NumberOperator::IsEmpty => OperatorType::IsEmpty,
            NumberOperator::IsNotEmpty => OperatorType::IsNotEmpty,
        }
    }
}

/// operator of DATE items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateOperator {
    Before {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<DateValue>,
    },
    After {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<DateValue>,
    },
    Eq {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<DateValue>,
    },
    Between {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<DateValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<DateValue>,
    },
    IsEmpty,
    IsNotEmpty,
}

impl Operator for DateOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            DateOperator::Before { .. } => OperatorType::Before,
            DateOperator::After { .. } => OperatorType::After,
            DateOperator::Eq { .. } => OperatorType::Eq,
            DateOperator::Between { .. } => OperatorType::Between,
            DateOperator::IsEmpty => OperatorType::IsEmpty,
            DateOperator::IsNotEmpty => OperatorType::IsNotEmpty,
        }
    }
}

/// operator of ENUM items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumOperator {
    #[serde(rename_all = "camelCase")]
    Eq {
        #[serde(default)]
        option_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Ne {
        #[serde(default)]
        option_id: String,
    },
    #[serde(rename_all = "camelCase")]
    In {
        #[serde(default)]
        option_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    NotIn {
        #[serde(default)]
        option_ids: Vec<String>,
    },
    IsEmpty,
    IsNotEmpty,
}

impl Operator for EnumOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            EnumOperator::Eq { .. } => OperatorType::Eq,
            EnumOperator::Ne { .. } => OperatorType::Ne,
            EnumOperator::In { .. } => OperatorType::In,
            EnumOperator::NotIn { .. } => OperatorType::NotIn,
            EnumOperator::IsEmpty => OperatorType::IsEmpty,
            EnumOperator::IsNotEmpty => OperatorType::IsNotEmpty,
        }
    }
}

/// operator of STATUS items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusOperator {
    #[serde(rename_all = "camelCase")]
    Eq {
        #[serde(default)]
        status_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Reached {
        #[serde(default)]
        status_id: String,
    },
    #[serde(rename_all = "camelCase")]
    NotReached {
        #[serde(default)]
        status_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Passed {
        #[serde(default)]
        status_id: String,
    },
    #[serde(rename_all = "camelCase")]
    In {
        #[serde(default)]
        status_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    NotIn {
        #[serde(default)]
        status_ids: Vec<String>,
    },
}

impl Operator for StatusOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            StatusOperator::Eq { .. } => OperatorType::Eq,
            StatusOperator::Reached { .. } => OperatorType::Reached,
            StatusOperator::NotReached { .. } => OperatorType::NotReached,
            StatusOperator::Passed { .. } => OperatorType::Passed,
            StatusOperator::In { .. } => OperatorType::In,
            StatusOperator::NotIn { .. } => OperatorType::NotIn,
        }
    }
}

/// operator of WEB_URL items (presence checks only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebUrlOperator {
    IsEmpty,
    IsNotEmpty,
}

impl Operator for WebUrlOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            WebUrlOperator::IsEmpty => OperatorType::IsEmpty,
            WebUrlOperator::IsNotEmpty => OperatorType::IsNotEmpty,
        }
    }
}

/// operator of LINK items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkOperator {
    #[default]
    HasAny,
    IsEmpty,
    In {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<LinkValue>,
    },
    NotIn {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<LinkValue>,
    },
}

impl Operator for LinkOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            LinkOperator::HasAny => OperatorType::HasAny,
            LinkOperator::IsEmpty => OperatorType::IsEmpty,
            LinkOperator::In { .. } => OperatorType::In,
            LinkOperator::NotIn { .. } => OperatorType::NotIn,
        }
    }
}

/// operator of CARD_CYCLE items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardCycleOperator {
    In {
        #[serde(default)]
        values: Vec<CardCycle>,
    },
}

impl Operator for CardCycleOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            CardCycleOperator::In { .. } => OperatorType::In,
        }
    }
}

/// operator of CREATED_BY and UPDATED_BY items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserOperator {
    IsCurrentUser,
    IsNotCurrentUser,
    #[serde(rename_all = "camelCase")]
    Eq {
        #[serde(default)]
        user_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Ne {
        #[serde(default)]
        user_id: String,
    },
    #[serde(rename_all = "camelCase")]
    In {
        #[serde(default)]
        user_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    NotIn {
        #[serde(default)]
        user_ids: Vec<String>,
    },
}

impl Operator for UserOperator {
    fn operator_type(&self) -> OperatorType {
        match self {
            UserOperator::IsCurrentUser => OperatorType::IsCurrentUser,
            UserOperator::IsNotCurrentUser => OperatorType::IsNotCurrentUser,
            UserOperator::Eq { .. } => OperatorType::Eq,
            UserOperator::Ne { .. } => OperatorType::Ne,
            UserOperator::In { .. } => OperatorType::In,
            UserOperator::NotIn { .. } => OperatorType::NotIn,
        }
    }
}

// ============================================================================
// Items and nodes
// ============================================================================

/// a leaf predicate: what is tested and how
///
/// `operator` is `None` when it is missing on the wire or does not belong to
/// the item's kind; such an item is never complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, O: Serialize",
    deserialize = "S: DeserializeOwned + Default, O: DeserializeOwned"
))]
pub struct Item<S, O> {
    /// an unreadable subject decodes as the empty default, leaving the item incomplete
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub subject: S,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub operator: Option<O>,
}

impl<S, O> Item<S, O> {
    pub fn new(subject: S, operator: O) -> Self {
        Self {
            subject,
            operator: Some(operator),
        }
    }
}

pub type TextItem = Item<FieldSubject, TextOperator>;
pub type SystemTextItem = Item<SystemSubject, TextOperator>;
pub type NumberItem = Item<FieldSubject, NumberOperator>;
pub type DateItem = Item<DateSubject, DateOperator>;
pub type EnumItem = Item<FieldSubject, EnumOperator>;
pub type StatusItem = Item<StatusSubject, StatusOperator>;
pub type WebUrlItem = Item<FieldSubject, WebUrlOperator>;
pub type LinkItem = Item<LinkSubject, LinkOperator>;
pub type CardCycleItem = Item<SystemSubject, CardCycleOperator>;
pub type UserItem = Item<SystemSubject, UserOperator>;

/// a typed leaf, discriminated by `nodeType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionItem {
    Text(TextItem),
    Title(SystemTextItem),
    Code(SystemTextItem),
    Number(NumberItem),
    Date(DateItem),
    Enum(EnumItem),
    Status(StatusItem),
    WebUrl(WebUrlItem),
    Link(LinkItem),
    CardCycle(CardCycleItem),
    CreatedBy(UserItem),
    UpdatedBy(UserItem),
}

impl ConditionItem {
    pub fn node_type(&self) -> NodeType {
        match self {
            ConditionItem::Text(_) => NodeType::Text,
            ConditionItem::Title(_) => NodeType::Title,
            ConditionItem::Code(_) => NodeType::Code,
            ConditionItem::Number(_) => NodeType::Number,
            ConditionItem::Date(_) => NodeType::Date,
            ConditionItem::Enum(_) => NodeType::Enum,
            ConditionItem::Status(_) => NodeType::Status,
            ConditionItem::WebUrl(_) => NodeType::WebUrl,
            ConditionItem::Link(_) => NodeType::Link,
            ConditionItem::CardCycle(_) => NodeType::CardCycle,
            ConditionItem::CreatedBy(_) => NodeType::CreatedBy,
            ConditionItem::UpdatedBy(_) => NodeType::UpdatedBy,
        }
    }

    pub fn subject(&self) -> &dyn Subject {
        match self {
            ConditionItem::Text(item) => &item.subject,
            ConditionItem::Title(item) | ConditionItem::Code(item) => &item.subject,
            ConditionItem::Number(item) => &item.subject,
            ConditionItem::Date(item) => &item.subject,
            ConditionItem::Enum(item) => &item.subject,
            ConditionItem::Status(item) => &item.subject,
            ConditionItem::WebUrl(item) => &item.subject,
            ConditionItem::Link(item) => &item.subject,
            ConditionItem::CardCycle(item) => &item.subject,
            ConditionItem::CreatedBy(item) | ConditionItem::UpdatedBy(item) => &item.subject,
        }
    }

    pub fn subject_mut(&mut self) -> &mut dyn Subject {
        match self {
            ConditionItem::Text(item) => &mut item.subject,
            ConditionItem::Title(item) | ConditionItem::Code(item) => &mut item.subject,
            ConditionItem::Number(item) => &mut item.subject,
            ConditionItem::Date(item) => &mut item.subject,
            ConditionItem::Enum(item) => &mut item.subject,
            ConditionItem::Status(item) => &mut item.subject,
            ConditionItem::WebUrl(item) => &mut item.subject,
            ConditionItem::Link(item) => &mut item.subject,
            ConditionItem::CardCycle(item) => &mut item.subject,
            ConditionItem::CreatedBy(item) | ConditionItem::UpdatedBy(item) => {
                &mut item.subject
            }
        }
    }

    /// the operator type, if an operator is present
    pub fn operator_type(&self) -> Option<OperatorType> {
        fn of<O: Operator>(op: &Option<O>) -> Option<OperatorType> {
            op.as_ref().map(Operator::operator_type)
        }
        match self {
            ConditionItem::Text(item) => of(&item.operator),
            ConditionItem::Title(item) | ConditionItem::Code(item) => of(&item.operator),
            ConditionItem::Number(item) => of(&item.operator),
            ConditionItem::Date(item) => of(&item.operator),
            ConditionItem::Enum(item) => of(&item.operator),
            ConditionItem::Status(item) => of(&item.operator),
            ConditionItem::WebUrl(item) => of(&item.operator),
            ConditionItem::Link(item) => of(&item.operator),
            ConditionItem::CardCycle(item) => of(&item.operator),
            ConditionItem::CreatedBy(item) | ConditionItem::UpdatedBy(item) => {
                of(&item.operator)
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.subject().path()
    }

    /// canonicalize the subject path (empty hop-list becomes absent)
    pub fn normalize(&mut self) {
        let path = self.subject_mut().path_mut();
        *path = normalize_path(path.take());
    }
}

/// boolean combinator of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

impl GroupOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupOperator::And => "AND",
            GroupOperator::Or => "OR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" | "ALL" => Some(GroupOperator::And),
            "OR" | "ANY" => Some(GroupOperator::Or),
            _ => None,
        }
    }
}

/// ordered list of child nodes combined with AND/OR
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub operator: GroupOperator,
    #[serde(default)]
    pub children: Vec<ConditionNode>,
}

impl ConditionGroup {
    pub fn new(operator: GroupOperator) -> Self {
        Self {
            operator,
            children: Vec::new(),
        }
    }

    /// append a child, keeping insertion order
    pub fn push(&mut self, node: impl Into<ConditionNode>) {
        self.children.push(node.into());
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// a node of the tree: either a group or a leaf item
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Group(ConditionGroup),
    Item(ConditionItem),
}

/// whether `node` is a group rather than a leaf
pub fn is_condition_group(node: &ConditionNode) -> bool {
    matches!(node, ConditionNode::Group(_))
}

/// the same check on an undecoded node: `nodeType` is `"GROUP"`
pub fn is_group_node_value(value: &serde_json::Value) -> bool {
    value.get("nodeType").and_then(serde_json::Value::as_str) == Some(GROUP_NODE_TYPE)
}

impl ConditionNode {
    pub fn as_group(&self) -> Option<&ConditionGroup> {
        match self {
            ConditionNode::Group(group) => Some(group),
            ConditionNode::Item(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut ConditionGroup> {
        match self {
            ConditionNode::Group(group) => Some(group),
            ConditionNode::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&ConditionItem> {
        match self {
            ConditionNode::Item(item) => Some(item),
            ConditionNode::Group(_) => None,
        }
    }

    /// canonicalize every path in this subtree
    pub fn normalize(&mut self) {
        match self {
            ConditionNode::Group(group) => {
                group.children.iter_mut().for_each(ConditionNode::normalize)
            }
            ConditionNode::Item(item) => item.normalize(),
        }
    }
}

impl From<ConditionGroup> for ConditionNode {
    fn from(group: ConditionGroup) -> Self {
        ConditionNode::Group(group)
    }
}

impl From<ConditionItem> for ConditionNode {
    fn from(item: ConditionItem) -> Self {
        ConditionNode::Item(item)
    }
}

#[derive(Serialize)]
struct TaggedGroup<'a> {
    #[serde(rename = "nodeType")]
    node_type: &'static str,
    #[serde(flatten)]
    group: &'a ConditionGroup,
}

impl Serialize for ConditionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionNode::Group(group) => TaggedGroup {
                node_type: GROUP_NODE_TYPE,
                group,
            }
            .serialize(serializer),
            ConditionNode::Item(item) => item.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConditionNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let node = if is_group_node_value(&value) {
            serde_json::from_value(value).map(ConditionNode::Group)
        } else {
            serde_json::from_value(value).map(ConditionNode::Item)
        };
        node.map_err(de::Error::custom)
    }
}

/// the whole filter expression; no root means "no filter"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<ConditionNode>,
}

impl Condition {
    pub fn new(root: impl Into<ConditionNode>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// the root group, if the root is a group
    pub fn root_group_mut(&mut self) -> Option<&mut ConditionGroup> {
        self.root.as_mut().and_then(ConditionNode::as_group_mut)
    }

    /// canonicalize every path in the tree
    pub fn normalize(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.normalize();
        }
    }
}
