// library-level tests for condition documents: parsing, editing and completeness

use cond_engine::conditions::{
    collect_references, create_condition_item_for_field, create_empty_condition,
    create_link_condition_item, create_path, create_specific_date_value,
    create_system_date_condition_item, get_incomplete_condition_count, is_condition_complete,
    is_condition_submittable, parse_condition, ConditionItem, ConditionNode, DateOperator,
    GroupOperator, LinkOperator, OperatorType, SystemDateField,
};
use chrono::NaiveDate;

use crate::common::COMPLETE_CONDITION;

#[test]
fn test_serialized_condition_parses_back_unchanged() {
    let condition = parse_condition(COMPLETE_CONDITION).unwrap();
    let json = serde_json::to_string(&condition).unwrap();
    assert_eq!(parse_condition(&json).unwrap(), condition);
}

#[test]
fn test_empty_path_is_never_emitted() {
    let mut condition = create_empty_condition();
    condition.root_group_mut().unwrap().push(create_link_condition_item(
        "lt-1:SOURCE",
        Some(create_path(vec![])),
        LinkOperator::HasAny,
    ));
    condition.normalize();

    let json = serde_json::to_value(&condition).unwrap();
    let subject = &json["root"]["children"][0]["subject"];
    assert_eq!(subject["linkFieldId"], "lt-1:SOURCE");
    assert!(subject.get("path").is_none());
}

#[test]
fn test_editor_flow_becomes_submittable() {
    let mut condition = create_empty_condition();
    assert!(is_condition_submittable(&condition));
    assert!(!is_condition_complete(&condition));

    // picking a field adds an item with a blank value
    condition
        .root_group_mut()
        .unwrap()
        .push(create_condition_item_for_field("TEXT_FIELD", "f-title"));
    assert!(!is_condition_submittable(&condition));
    assert_eq!(get_incomplete_condition_count(&condition), 1);

    // a system date item starts on TODAY and is complete immediately
    condition
        .root_group_mut()
        .unwrap()
        .push(create_system_date_condition_item(SystemDateField::CreatedAt));
    assert_eq!(get_incomplete_condition_count(&condition), 1);

    // fill the text value
    let root = condition.root_group_mut().unwrap();
    if let ConditionNode::Item(ConditionItem::Text(item)) = &mut root.children[0] {
        item.operator = Some(cond_engine::conditions::TextOperator::Contains {
            value: "launch".to_string(),
        });
    }
    assert!(is_condition_complete(&condition));
    assert!(is_condition_submittable(&condition));
}

#[test]
fn test_specific_date_value_is_complete() {
    let mut condition = create_empty_condition();
    let mut item = create_system_date_condition_item(SystemDateField::DiscardedAt);
    if let ConditionItem::Date(date) = &mut item {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        date.operator = Some(DateOperator::After {
            value: Some(create_specific_date_value(day)),
        });
    }
    condition.root_group_mut().unwrap().push(item);

    assert!(is_condition_complete(&condition));
    let json = serde_json::to_value(&condition).unwrap();
    assert_eq!(
        json["root"]["children"][0]["operator"]["value"]["value"],
        "2024-02-29"
    );
}

#[test]
fn test_cross_kind_operator_makes_item_incomplete() {
    let condition = parse_condition(
        r#"{ "root": { "nodeType": "GROUP", "operator": "OR", "children": [
            { "nodeType": "STATUS", "subject": { "streamId": "vs-1" },
              "operator": { "type": "HAS_ANY" } }
        ] } }"#,
    )
    .unwrap();

    let root = condition.root.as_ref().and_then(ConditionNode::as_group).unwrap();
    assert_eq!(root.operator, GroupOperator::Or);
    assert_eq!(root.children[0].as_item().unwrap().operator_type(), None);
    assert!(!is_condition_complete(&condition));

    // the stream still counts as referenced
    let refs = collect_references(&condition);
    assert!(refs.stream_ids.contains("vs-1"));
}

#[test]
fn test_no_value_operators_are_complete() {
    let condition = parse_condition(
        r#"{ "nodeType": "GROUP", "children": [
            { "nodeType": "NUMBER", "subject": { "fieldId": "n" }, "operator": { "type": "IS_EMPTY" } },
            { "nodeType": "ENUM", "subject": { "fieldId": "e" }, "operator": { "type": "IS_NOT_EMPTY" } },
            { "nodeType": "CREATED_BY", "operator": { "type": "IS_NOT_CURRENT_USER" } }
        ] }"#,
    )
    .unwrap();

    assert!(is_condition_complete(&condition));
    let root = condition.root.as_ref().and_then(ConditionNode::as_group).unwrap();
    assert_eq!(
        root.children[2].as_item().unwrap().operator_type(),
        Some(OperatorType::IsNotCurrentUser)
    );
}
