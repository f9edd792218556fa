// library-level tests for the display-info resolver

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cond_engine::conditions::{collect_references, parse_condition, Condition};
use cond_engine::resolver::{
    CardInfo, DisplayInfo, DisplayInfoResolver, DisplayInfoSource, EnumOption, LoadOutcome,
    ResolveError,
};

use crate::common::COMPLETE_CONDITION;

/// answers with names for exactly the ids the condition references
struct ReferenceEchoSource {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DisplayInfoSource for ReferenceEchoSource {
    async fn fetch_display_info(&self, condition: &Condition) -> Result<DisplayInfo, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let refs = collect_references(condition);
        let mut info = DisplayInfo::default();
        for id in &refs.field_ids {
            info.field_names.insert(id.clone(), format!("Field {}", id));
        }
        for id in &refs.link_field_ids {
            info.link_field_names.insert(id.clone(), format!("Link {}", id));
        }
        for (field_id, options) in &refs.enum_option_ids {
            let options = options
                .iter()
                .map(|id| EnumOption::new(id.clone(), id.to_uppercase()))
                .collect();
            info.enum_options.insert(field_id.clone(), options);
        }
        for id in &refs.card_ids {
            info.cards
                .insert(id.clone(), CardInfo::new(id.clone(), "PRJ-7", "Ship it"));
        }
        for id in &refs.status_ids {
            info.status_names.insert(id.clone(), "In review".to_string());
        }
        Ok(info)
    }
}

fn echo_resolver() -> (DisplayInfoResolver<ReferenceEchoSource>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = DisplayInfoResolver::new(ReferenceEchoSource {
        calls: calls.clone(),
    });
    (resolver, calls)
}

#[tokio::test]
async fn test_load_resolves_every_reference() {
    let (resolver, calls) = echo_resolver();
    let condition = parse_condition(COMPLETE_CONDITION).unwrap();

    assert_eq!(resolver.load_display_info(&condition).await, LoadOutcome::Loaded);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(resolver.get_field_name("f-title"), "Field f-title");
    assert_eq!(
        resolver.get_link_field_name("lt-parent:TARGET"),
        "Link lt-parent:TARGET"
    );
    assert_eq!(resolver.get_enum_option_name("f-priority", "o-high"), "O-HIGH");
    assert_eq!(resolver.get_card_label("c-7"), "PRJ-7 Ship it");
    assert_eq!(resolver.get_status_name("st-review"), "In review");
}

#[tokio::test]
async fn test_concurrent_loads_share_one_request() {
    let (resolver, calls) = echo_resolver();
    let condition = parse_condition(COMPLETE_CONDITION).unwrap();

    let (a, b, c) = tokio::join!(
        resolver.load_display_info(&condition),
        resolver.load_display_info(&condition),
        resolver.load_display_info(&condition),
    );

    assert_eq!(a, LoadOutcome::Loaded);
    assert_eq!(b, LoadOutcome::InFlight);
    assert_eq!(c, LoadOutcome::InFlight);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_edits_after_load_are_pushed_not_fetched() {
    let (resolver, calls) = echo_resolver();
    let condition = parse_condition(COMPLETE_CONDITION).unwrap();
    resolver.load_display_info(&condition).await;

    // a new field picked in the editor
    resolver.add_field_name("f-owner", "Owner");
    let edited = parse_condition(
        r#"{ "nodeType": "TEXT", "subject": { "fieldId": "f-owner" },
             "operator": { "type": "IS_EMPTY" } }"#,
    )
    .unwrap();

    assert_eq!(
        resolver.load_display_info(&edited).await,
        LoadOutcome::AlreadyInitialized
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.get_field_name("f-owner"), "Owner");
    assert_eq!(resolver.get_field_name("f-title"), "Field f-title");
}

#[tokio::test]
async fn test_reset_between_conditions() {
    let (resolver, calls) = echo_resolver();
    let condition = parse_condition(COMPLETE_CONDITION).unwrap();
    resolver.load_display_info(&condition).await;

    resolver.reset();
    assert!(resolver.snapshot().is_empty());
    assert_eq!(resolver.get_field_name("f-title"), "f-title");

    assert_eq!(resolver.load_display_info(&condition).await, LoadOutcome::Loaded);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
