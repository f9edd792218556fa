//! completeness checks for condition trees
//!
//! the types describe what shape a node may take; this module answers
//! whether it is actually filled in. a group is complete when it has at
//! least one child and every child is complete. an item is complete when
//! its subject names what is tested and its operator carries every value
//! its type requires.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::types::{
    CardCycleOperator, Condition, ConditionGroup, ConditionItem, ConditionNode, DateOperator,
    DateSubject, DateValue, EnumOperator, FieldSubject, Item, LinkOperator, LinkSubject,
    LinkValue, NumberOperator, NumberValue, Operator, OperatorType, Path, StatusOperator,
    StatusSubject, Subject, SystemSubject, TextOperator, UserOperator, WebUrlOperator,
};

/// whether an operator type requires a comparison value
pub fn operator_needs_value(op: OperatorType) -> bool {
    !matches!(
        op,
        OperatorType::IsEmpty
            | OperatorType::IsNotEmpty
            | OperatorType::HasAny
            | OperatorType::IsCurrentUser
            | OperatorType::IsNotCurrentUser
    )
}

/// whether every leaf under `node` is fully specified
pub fn is_condition_node_complete(node: &ConditionNode) -> bool {
    match node {
        ConditionNode::Group(group) => is_condition_group_complete(group),
        ConditionNode::Item(item) => is_condition_item_complete(item),
    }
}

/// a group with no children is an editable placeholder, never complete
pub fn is_condition_group_complete(group: &ConditionGroup) -> bool {
    !group.children.is_empty() && group.children.iter().all(is_condition_node_complete)
}

pub fn is_condition_item_complete(item: &ConditionItem) -> bool {
    let Some(op) = item.operator_type() else {
        return false;
    };
    if !item.node_type().allows(op) {
        return false;
    }

    match item {
        ConditionItem::Text(item) => item.is_complete(),
        ConditionItem::Title(item) | ConditionItem::Code(item) => item.is_complete(),
        ConditionItem::Number(item) => item.is_complete(),
        ConditionItem::Date(item) => item.is_complete(),
        ConditionItem::Enum(item) => item.is_complete(),
        ConditionItem::Status(item) => item.is_complete(),
        ConditionItem::WebUrl(item) => item.is_complete(),
        ConditionItem::Link(item) => item.is_complete(),
        ConditionItem::CardCycle(item) => item.is_complete(),
        ConditionItem::CreatedBy(item) | ConditionItem::UpdatedBy(item) => item.is_complete(),
    }
}

/// whether the whole condition is fully specified; no root counts as complete
pub fn is_condition_complete(condition: &Condition) -> bool {
    condition
        .root
        .as_ref()
        .map_or(true, is_condition_node_complete)
}

/// true when there is no filter at all: no root, or a root group without children
pub fn is_condition_empty(condition: &Condition) -> bool {
    condition
        .root
        .as_ref()
        .map_or(true, |root| root.as_group().is_some_and(ConditionGroup::is_empty))
}

/// whether an editor may save: either no filter, or a complete one
pub fn is_condition_submittable(condition: &Condition) -> bool {
    is_condition_empty(condition) || is_condition_complete(condition)
}

/// number of incomplete units in the condition
///
/// each incomplete item counts once and each empty group counts once.
pub fn get_incomplete_condition_count(condition: &Condition) -> usize {
    condition
        .root
        .as_ref()
        .map_or(0, count_incomplete_nodes)
}

pub fn count_incomplete_nodes(node: &ConditionNode) -> usize {
    match node {
        ConditionNode::Group(group) if group.children.is_empty() => 1,
        ConditionNode::Group(group) => group.children.iter().map(count_incomplete_nodes).sum(),
        ConditionNode::Item(item) => usize::from(!is_condition_item_complete(item)),
    }
}

/// deepest group nesting in the condition (a lone root group is depth 1)
pub fn condition_depth(condition: &Condition) -> usize {
    condition.root.as_ref().map_or(0, node_depth)
}

pub fn node_depth(node: &ConditionNode) -> usize {
    match node {
        ConditionNode::Group(group) => {
            1 + group.children.iter().map(node_depth).max().unwrap_or(0)
        }
        ConditionNode::Item(_) => 0,
    }
}

/// whether groups nest deeper than `max_depth`
pub fn exceeds_max_depth(condition: &Condition, max_depth: usize) -> bool {
    condition_depth(condition) > max_depth
}

// ============================================================================
// Per-shape completeness
// ============================================================================

trait Completeness {
    fn is_complete(&self) -> bool;
}

fn is_filled(s: &str) -> bool {
    !s.trim().is_empty()
}

fn all_filled(ids: &[String]) -> bool {
    !ids.is_empty() && ids.iter().all(|id| is_filled(id))
}

fn is_path_complete(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.link_nodes.iter().all(|hop| is_filled(hop)))
}

impl<S, O> Completeness for Item<S, O>
where
    S: Subject + Completeness,
    O: Operator + Completeness,
{
    fn is_complete(&self) -> bool {
        let subject_ok = self.subject.is_complete() && is_path_complete(self.subject.path());
        let operator_ok = self.operator.as_ref().is_some_and(|op| {
            !operator_needs_value(op.operator_type()) || op.is_complete()
        });
        subject_ok && operator_ok
    }
}

impl Completeness for FieldSubject {
    fn is_complete(&self) -> bool {
        is_filled(&self.field_id)
    }
}

impl Completeness for SystemSubject {
    fn is_complete(&self) -> bool {
        true
    }
}

impl Completeness for StatusSubject {
    fn is_complete(&self) -> bool {
        is_filled(&self.stream_id)
    }
}

impl Completeness for LinkSubject {
    fn is_complete(&self) -> bool {
        is_filled(&self.link_field_id)
    }
}

impl Completeness for DateSubject {
    fn is_complete(&self) -> bool {
        match self {
            DateSubject::System { system_field, .. } => system_field.is_some(),
            DateSubject::Field { field_id, .. } => is_filled(field_id),
        }
    }
}

impl Completeness for NumberValue {
    fn is_complete(&self) -> bool {
        match self {
            NumberValue::Static { value } => value.is_some_and(f64::is_finite),
            NumberValue::Reference { value } => is_filled(value),
        }
    }
}

impl Completeness for DateValue {
    fn is_complete(&self) -> bool {
        match self {
            DateValue::KeyDate { key_date } => !key_date.is_blank(),
            DateValue::Specific { value } => is_iso_date(value),
        }
    }
}

/// accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
fn is_iso_date(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && (NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            || DateTime::parse_from_rfc3339(value).is_ok()
            || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok())
}

impl Completeness for LinkValue {
    fn is_complete(&self) -> bool {
        all_filled(self.card_ids())
    }
}

fn is_some_complete<T: Completeness>(value: &Option<T>) -> bool {
    value.as_ref().is_some_and(Completeness::is_complete)
}

impl Completeness for TextOperator {
    fn is_complete(&self) -> bool {
        self.value().map_or(true, is_filled)
    }
}

impl Completeness for NumberOperator {
    fn is_complete(&self) -> bool {
        match self {
            NumberOperator::Eq { value }
            | NumberOperator::Ne { value }
            | NumberOperator::Gt { value }
            | NumberOperator::Ge { value }
            | NumberOperator::Lt { value }
            | NumberOperator::Le { value } => is_some_complete(value),
            NumberOperator::Between { start, end } => {
                is_some_complete(start) && is_some_complete(end)
            }
            NumberOperator::IsEmpty | NumberOperator::IsNotEmpty => true,
        }
    }
}

impl Completeness for DateOperator {
    fn is_complete(&self) -> bool {
        match self {
            DateOperator::Before { value }
            | DateOperator::After { value }
            | DateOperator::Eq { value } => is_some_complete(value),
            DateOperator::Between { start, end } => {
                is_some_complete(start) && is_some_complete(end)
            }
            DateOperator::IsEmpty | DateOperator::IsNotEmpty => true,
        }
    }
}

impl Completeness for EnumOperator {
    fn is_complete(&self) -> bool {
        match self {
            EnumOperator::Eq { option_id } | EnumOperator::Ne { option_id } => {
                is_filled(option_id)
            }
            EnumOperator::In { option_ids } | EnumOperator::NotIn { option_ids } => {
                all_filled(option_ids)
            }
            EnumOperator::IsEmpty | EnumOperator::IsNotEmpty => true,
        }
    }
}

impl Completeness for StatusOperator {
    fn is_complete(&self) -> bool {
        match self {
            StatusOperator::Eq { status_id }
            | StatusOperator::Reached { status_id }
            | StatusOperator::NotReached { status_id }
            | StatusOperator::Passed { status_id } => is_filled(status_id),
            StatusOperator::In { status_ids } | StatusOperator::NotIn { status_ids } => {
                all_filled(status_ids)
            }
        }
    }
}

impl Completeness for WebUrlOperator {
    fn is_complete(&self) -> bool {
        true
    }
}

impl Completeness for LinkOperator {
    fn is_complete(&self) -> bool {
        match self {
            LinkOperator::HasAny | LinkOperator::IsEmpty => true,
            LinkOperator::In { value } | LinkOperator::NotIn { value } => is_some_complete(value),
        }
    }
}

impl Completeness for CardCycleOperator {
    fn is_complete(&self) -> bool {
        match self {
            CardCycleOperator::In { values } => !values.is_empty(),
        }
    }
}

impl Completeness for UserOperator {
    fn is_complete(&self) -> bool {
        match self {
            UserOperator::IsCurrentUser | UserOperator::IsNotCurrentUser => true,
            UserOperator::Eq { user_id } | UserOperator::Ne { user_id } => is_filled(user_id),
            UserOperator::In { user_ids } | UserOperator::NotIn { user_ids } => {
                all_filled(user_ids)
            }
        }
    }
}
