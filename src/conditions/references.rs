//! collects every opaque id a condition refers to
//!
//! this is the client-side mirror of what the display-info endpoint
//! resolves, used to list references and to spot names that are missing
//! from a resolver cache.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::types::{
    Condition, ConditionItem, ConditionNode, DateSubject, EnumOperator, LinkOperator,
    NumberOperator, NumberValue, Path, StatusOperator, UserOperator,
};

/// ids referenced by a condition, grouped by what they identify
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionReferences {
    pub field_ids: BTreeSet<String>,
    pub link_field_ids: BTreeSet<String>,
    /// enum option ids keyed by the field they belong to
    pub enum_option_ids: BTreeMap<String, BTreeSet<String>>,
    pub card_ids: BTreeSet<String>,
    pub status_ids: BTreeSet<String>,
    pub stream_ids: BTreeSet<String>,
    pub user_ids: BTreeSet<String>,
}

impl ConditionReferences {
    pub fn is_empty(&self) -> bool {
        self.field_ids.is_empty()
            && self.link_field_ids.is_empty()
            && self.enum_option_ids.is_empty()
            && self.card_ids.is_empty()
            && self.status_ids.is_empty()
            && self.stream_ids.is_empty()
            && self.user_ids.is_empty()
    }

    fn add_field(&mut self, id: &str) {
        insert_filled(&mut self.field_ids, id);
    }

    fn add_path(&mut self, path: Option<&Path>) {
        for hop in path.into_iter().flat_map(|p| p.link_nodes.iter()) {
            insert_filled(&mut self.link_field_ids, hop);
        }
    }

    fn add_enum_options<'a>(
        &mut self,
        field_id: &str,
        ids: impl IntoIterator<Item = &'a String>,
    ) {
        let options = self.enum_option_ids.entry(field_id.to_string()).or_default();
        for id in ids {
            insert_filled(options, id);
        }
        if options.is_empty() {
            self.enum_option_ids.remove(field_id);
        }
    }

    fn add_number_value(&mut self, value: Option<&NumberValue>) {
        if let Some(NumberValue::Reference { value }) = value {
            self.add_field(value);
        }
    }
}

fn insert_filled(set: &mut BTreeSet<String>, id: &str) {
    if !id.trim().is_empty() {
        set.insert(id.to_string());
    }
}

/// walk the whole tree and gather its references
pub fn collect_references(condition: &Condition) -> ConditionReferences {
    let mut refs = ConditionReferences::default();
    if let Some(root) = &condition.root {
        collect_node(root, &mut refs);
    }
    refs
}

fn collect_node(node: &ConditionNode, refs: &mut ConditionReferences) {
    match node {
        ConditionNode::Group(group) => {
            for child in &group.children {
                collect_node(child, refs);
            }
        }
        ConditionNode::Item(item) => collect_item(item, refs),
    }
}

fn collect_item(item: &ConditionItem, refs: &mut ConditionReferences) {
    refs.add_path(item.path());

    match item {
        ConditionItem::Text(item) => refs.add_field(&item.subject.field_id),
        ConditionItem::WebUrl(item) => refs.add_field(&item.subject.field_id),
        ConditionItem::Title(_) | ConditionItem::Code(_) | ConditionItem::CardCycle(_) => {}
        ConditionItem::Number(item) => {
            refs.add_field(&item.subject.field_id);
            match &item.operator {
                Some(
                    NumberOperator::Eq { value }
                    | NumberOperator::Ne { value }
                    | NumberOperator::Gt { value }
                    | NumberOperator::Ge { value }
                    | NumberOperator::Lt { value }
                    | NumberOperator::Le { value },
                ) => refs.add_number_value(value.as_ref()),
                Some(NumberOperator::Between { start, end }) => {
                    refs.add_number_value(start.as_ref());
                    refs.add_number_value(end.as_ref());
                }
                Some(NumberOperator::IsEmpty | NumberOperator::IsNotEmpty) | None => {}
            }
        }
        ConditionItem::Date(item) => {
            if let DateSubject::Field { field_id, .. } = &item.subject {
                refs.add_field(field_id);
            }
        }
        ConditionItem::Enum(item) => {
            let field_id = &item.subject.field_id;
            refs.add_field(field_id);
            match &item.operator {
                Some(EnumOperator::Eq { option_id } | EnumOperator::Ne { option_id }) => {
                    refs.add_enum_options(field_id, [option_id])
                }
                Some(EnumOperator::In { option_ids } | EnumOperator::NotIn { option_ids }) => {
                    refs.add_enum_options(field_id, option_ids)
                }
                Some(EnumOperator::IsEmpty | EnumOperator::IsNotEmpty) | None => {}
            }
        }
        ConditionItem::Status(item) => {
            insert_filled(&mut refs.stream_ids, &item.subject.stream_id);
            match &item.operator {
                Some(
                    StatusOperator::Eq { status_id }
                    | StatusOperator::Reached { status_id }
                    | StatusOperator::NotReached { status_id }
                    | StatusOperator::Passed { status_id },
                ) => insert_filled(&mut refs.status_ids, status_id),
                Some(StatusOperator::In { status_ids } | StatusOperator::NotIn { status_ids }) => {
                    for id in status_ids {
                        insert_filled(&mut refs.status_ids, id);
                    }
                }
                None => {}
            }
        }
        ConditionItem::Link(item) => {
            insert_filled(&mut refs.link_field_ids, &item.subject.link_field_id);
            if let Some(
                LinkOperator::In { value: Some(value) } | LinkOperator::NotIn { value: Some(value) },
            ) = &item.operator
            {
                for id in value.card_ids() {
                    insert_filled(&mut refs.card_ids, id);
                }
            }
        }
        ConditionItem::CreatedBy(item) | ConditionItem::UpdatedBy(item) => match &item.operator {
            Some(UserOperator::Eq { user_id } | UserOperator::Ne { user_id }) => {
                insert_filled(&mut refs.user_ids, user_id)
            }
            Some(UserOperator::In { user_ids } | UserOperator::NotIn { user_ids }) => {
                for id in user_ids {
                    insert_filled(&mut refs.user_ids, id);
                }
            }
            Some(UserOperator::IsCurrentUser | UserOperator::IsNotCurrentUser) | None => {}
        },
    }
}
