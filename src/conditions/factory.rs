//! default construction for every node kind
//!
//! every constructor returns a well-shaped node; most defaults are still
//! incomplete (an empty field id, an empty comparison value) until an editor
//! fills them in. none of these functions fail.

use chrono::NaiveDate;

use super::key_date::KeyDate;
use super::types::{
    normalize_path, CardCycle, CardCycleOperator, Condition, ConditionGroup, ConditionItem,
    DateOperator, DateSubject, DateValue, EnumOperator, FieldSubject, GroupOperator, Item,
    LinkOperator, LinkSubject, LinkValue, NodeType, NumberOperator, NumberValue, Path,
    StatusOperator, StatusSubject, SystemDateField, SystemSubject, TextOperator, UserOperator,
    WebUrlOperator,
};

/// field-definition kinds and the item kind each maps to
const FIELD_KIND_NODE_TYPES: &[(&str, NodeType)] = &[
    ("TEXT_FIELD", NodeType::Text),
    ("MULTILINE_TEXT_FIELD", NodeType::Text),
    ("NUMBER_FIELD", NodeType::Number),
    ("DATE_FIELD", NodeType::Date),
    ("SINGLE_SELECT_FIELD", NodeType::Enum),
    ("MULTI_SELECT_FIELD", NodeType::Enum),
    ("LINK_FIELD", NodeType::Link),
    ("WEB_URL_FIELD", NodeType::WebUrl),
];

/// a condition whose root is an empty AND group
pub fn create_empty_condition() -> Condition {
    Condition::new(create_empty_condition_group(GroupOperator::And))
}

pub fn create_empty_condition_group(operator: GroupOperator) -> ConditionGroup {
    ConditionGroup::new(operator)
}

/// the default item for a kind
pub fn create_default_condition_item(node_type: NodeType) -> ConditionItem {
    match node_type {
        NodeType::Text => ConditionItem::Text(Item::new(
            FieldSubject::default(),
            empty_contains(),
        )),
        NodeType::Title => ConditionItem::Title(Item::new(
            SystemSubject::default(),
            empty_contains(),
        )),
        NodeType::Code => ConditionItem::Code(Item::new(
            SystemSubject::default(),
            empty_contains(),
        )),
        NodeType::Number => ConditionItem::Number(Item::new(
            FieldSubject::default(),
            NumberOperator::Eq { value: None },
        )),
        NodeType::Date => ConditionItem::Date(Item::new(
            DateSubject::default(),
            today_eq(),
        )),
        NodeType::Enum => ConditionItem::Enum(Item::new(
            FieldSubject::default(),
            EnumOperator::In {
                option_ids: Vec::new(),
            },
        )),
        NodeType::Status => ConditionItem::Status(Item::new(
            StatusSubject::default(),
            StatusOperator::Eq {
                status_id: String::new(),
            },
        )),
        NodeType::WebUrl => ConditionItem::WebUrl(Item::new(
            FieldSubject::default(),
            WebUrlOperator::IsNotEmpty,
        )),
        NodeType::Link => create_link_condition_item("", None, LinkOperator::HasAny),
        NodeType::CardCycle => ConditionItem::CardCycle(Item::new(
            SystemSubject::default(),
            CardCycleOperator::In {
                values: vec![CardCycle::Active],
            },
        )),
        NodeType::CreatedBy => ConditionItem::CreatedBy(Item::new(
            SystemSubject::default(),
            UserOperator::IsCurrentUser,
        )),
        NodeType::UpdatedBy => ConditionItem::UpdatedBy(Item::new(
            SystemSubject::default(),
            UserOperator::IsCurrentUser,
        )),
    }
}

fn empty_contains() -> TextOperator {
    TextOperator::Contains {
        value: String::new(),
    }
}

fn today_eq() -> DateOperator {
    DateOperator::Eq {
        value: Some(create_key_date_value(KeyDate::today())),
    }
}

/// map a field-definition kind (`TEXT_FIELD`, `NUMBER_FIELD`, ...) to an item kind
///
/// unmapped kinds fall back to TEXT and are logged.
pub fn node_type_for_field_kind(field_kind: &str) -> NodeType {
    FIELD_KIND_NODE_TYPES
        .iter()
        .find(|(kind, _)| *kind == field_kind)
        .map(|(_, node_type)| *node_type)
        .unwrap_or_else(|| {
            log::warn!(
                "no condition kind for field kind '{}', falling back to TEXT",
                field_kind
            );
            NodeType::Text
        })
}

/// default item for a user-defined field, with the field identity filled in
///
/// LINK fields take `field_id` as their composite link-field key, DATE fields
/// become a FIELD date subject.
pub fn create_condition_item_for_field(field_kind: &str, field_id: &str) -> ConditionItem {
    let mut item = create_default_condition_item(node_type_for_field_kind(field_kind));
    match &mut item {
        ConditionItem::Text(item) => item.subject.field_id = field_id.to_string(),
        ConditionItem::Number(item) => item.subject.field_id = field_id.to_string(),
        ConditionItem::Enum(item) => item.subject.field_id = field_id.to_string(),
        ConditionItem::WebUrl(item) => item.subject.field_id = field_id.to_string(),
        ConditionItem::Date(item) => {
            item.subject = DateSubject::Field {
                field_id: field_id.to_string(),
                path: None,
            }
        }
        ConditionItem::Link(item) => item.subject.link_field_id = field_id.to_string(),
        ConditionItem::Title(_)
        | ConditionItem::Code(_)
        | ConditionItem::Status(_)
        | ConditionItem::CardCycle(_)
        | ConditionItem::CreatedBy(_)
        | ConditionItem::UpdatedBy(_) => {}
    }
    item
}

pub fn create_path(link_nodes: Vec<String>) -> Path {
    Path::new(link_nodes)
}

/// LINK item on `link_field_id`; an empty path is omitted
pub fn create_link_condition_item(
    link_field_id: impl Into<String>,
    path: Option<Path>,
    operator: LinkOperator,
) -> ConditionItem {
    ConditionItem::Link(Item::new(
        LinkSubject {
            link_field_id: link_field_id.into(),
            path: normalize_path(path),
        },
        operator,
    ))
}

pub fn create_link_value(card_ids: Vec<String>) -> LinkValue {
    LinkValue::Static { card_ids }
}

/// DATE item on a built-in timestamp
pub fn create_system_date_condition_item(system_field: SystemDateField) -> ConditionItem {
    ConditionItem::Date(Item::new(
        DateSubject::System {
            system_field: Some(system_field),
            path: None,
        },
        today_eq(),
    ))
}

/// DATE item on a user-defined date field
pub fn create_field_date_condition_item(field_id: impl Into<String>) -> ConditionItem {
    ConditionItem::Date(Item::new(
        DateSubject::Field {
            field_id: field_id.into(),
            path: None,
        },
        today_eq(),
    ))
}

pub fn create_key_date_value(key_date: KeyDate) -> DateValue {
    DateValue::KeyDate { key_date }
}

/// absolute date value in ISO-8601 (`YYYY-MM-DD`) form
pub fn create_specific_date_value(date: NaiveDate) -> DateValue {
    DateValue::Specific {
        value: date.format("%Y-%m-%d").to_string(),
    }
}

pub fn create_number_value(value: f64) -> NumberValue {
    NumberValue::Static { value: Some(value) }
}
