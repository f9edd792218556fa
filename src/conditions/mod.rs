//! condition expression engine
//!
//! a condition is a tree of boolean groups (AND/OR) whose leaves are typed
//! predicates over card fields, system properties and value-stream states.
//! this module provides:
//! - the node model (`types`) and the composite link-field key (`link_key`)
//! - default construction for every node kind (`factory`)
//! - completeness checks that drive an editor's save state (`validate`)
//! - reference collection and human-readable rendering
//!
//! evaluation against real cards happens on the backend and is not part of
//! this crate.

mod factory;
mod format;
mod key_date;
mod link_key;
mod parser;
mod references;
mod types;
mod validate;

pub use factory::{
    create_condition_item_for_field, create_default_condition_item, create_empty_condition,
    create_empty_condition_group, create_field_date_condition_item, create_key_date_value,
    create_link_condition_item, create_link_value, create_number_value, create_path,
    create_specific_date_value, create_system_date_condition_item, node_type_for_field_kind,
};
pub use key_date::KeyDate;
pub use link_key::{
    build_link_field_id, parse_link_field_id, LinkFieldKey, LinkKeyError, LinkPosition,
};
pub use parser::{parse_condition, parse_condition_value, ParseError};
pub use references::{collect_references, ConditionReferences};
pub use types::{
    is_condition_group, is_group_node_value, normalize_path, CardCycle, CardCycleItem,
    CardCycleOperator, Condition, ConditionGroup, ConditionItem, ConditionNode, DateItem,
    DateOperator, DateSubject, DateValue, EnumItem, EnumOperator, FieldSubject, GroupOperator,
    Item, LinkItem, LinkOperator, LinkSubject, LinkValue, NodeType, NumberItem, NumberOperator,
    NumberValue, Operator, OperatorType, Path, StatusItem, StatusOperator, StatusSubject, Subject,
    SystemDateField, SystemSubject, SystemTextItem, TextItem, TextOperator, UserItem,
    UserOperator, WebUrlItem, WebUrlOperator, GROUP_NODE_TYPE,
};
pub use validate::{
    condition_depth, count_incomplete_nodes, exceeds_max_depth, get_incomplete_condition_count,
    is_condition_complete, is_condition_empty, is_condition_group_complete,
    is_condition_item_complete, is_condition_node_complete, is_condition_submittable,
    node_depth, operator_needs_value,
};
