//! display-info resolution for condition trees
//!
//! a condition carries opaque ids (fields, link fields, enum options, cards,
//! statuses). the resolver asks the backend for all of their names in one
//! request when a tree is loaded, then serves lookups from memory. names for
//! ids introduced later by editing are pushed in locally with the `add_*`
//! methods; the resolver never re-queries on its own.
//!
//! one resolver belongs to one editing session. `reset` hands it a clean
//! slate for a different condition.

mod cache;
mod client;

pub use cache::{CardInfo, DisplayInfo, EnumOption};
pub use client::{HttpDisplayInfoSource, DISPLAY_INFO_ENDPOINT};

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use crate::conditions::Condition;

/// errors from fetching display info
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("display-info request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("display-info endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid display-info response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// where display info comes from
#[async_trait]
pub trait DisplayInfoSource: Send + Sync {
    async fn fetch_display_info(&self, condition: &Condition) -> Result<DisplayInfo, ResolveError>;
}

/// what a call to `load_display_info` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// names were fetched and replaced the cache
    Loaded,
    /// the fetch failed; the error is available via `error()`
    Failed,
    /// a previous call already ran for this session
    AlreadyInitialized,
    /// another call is still waiting on the source
    InFlight,
    /// the condition has no root, nothing to resolve
    NoRoot,
    /// `reset` ran while the fetch was in flight, the response was dropped
    Discarded,
}

#[derive(Debug, Default)]
struct ResolverState {
    info: DisplayInfo,
    initialized: bool,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

/// single-flight, pull-once/push-thereafter name cache for one condition
pub struct DisplayInfoResolver<S> {
    source: S,
    state: Mutex<ResolverState>,
}

impl<S: DisplayInfoSource> DisplayInfoResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(ResolverState::default()),
        }
    }

    /// fetch names for every id in `condition`, at most once per session
    ///
    /// failures are recorded, not returned: lookups keep falling back to raw
    /// ids and editing continues.
    pub async fn load_display_info(&self, condition: &Condition) -> LoadOutcome {
        if condition.root.is_none() {
            return LoadOutcome::NoRoot;
        }

        let generation = {
            let mut state = self.state.lock();
            if state.loading {
                return LoadOutcome::InFlight;
            }
            if state.initialized {
                return LoadOutcome::AlreadyInitialized;
            }
            state.initialized = true;
            state.loading = true;
            state.error = None;
            state.generation
        };

        log::debug!("fetching display info (generation {})", generation);
        let result = self.source.fetch_display_info(condition).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            log::debug!(
                "discarding display info for generation {} (now {})",
                generation,
                state.generation
            );
            return LoadOutcome::Discarded;
        }
        state.loading = false;

        match result {
            Ok(info) => {
                log::debug!(
                    "display info loaded: {} fields, {} link fields, {} cards",
                    info.field_names.len(),
                    info.link_field_names.len(),
                    info.cards.len()
                );
                state.info = info;
                LoadOutcome::Loaded
            }
            Err(e) => {
                log::warn!("failed to load display info: {}", e);
                state.info = DisplayInfo::default();
                state.error = Some(e.to_string());
                LoadOutcome::Failed
            }
        }
    }
}

impl<S> DisplayInfoResolver<S> {
    /// clear the cache and allow a new load
    pub fn reset(&self) {
        let mut state = self.state.lock();
        let generation = state.generation.wrapping_add(1);
        *state = ResolverState {
            generation,
            ..ResolverState::default()
        };
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// message of the last failed load, if any
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// copy of the current cache
    pub fn snapshot(&self) -> DisplayInfo {
        self.state.lock().info.clone()
    }

    // lookups: never fail, fall back to the raw id

    pub fn get_field_name(&self, field_id: &str) -> String {
        self.state.lock().info.field_name(field_id)
    }

    pub fn get_link_field_name(&self, link_field_id: &str) -> String {
        self.state.lock().info.link_field_name(link_field_id)
    }

    pub fn get_enum_options(&self, field_id: &str) -> Vec<EnumOption> {
        self.state.lock().info.enum_options(field_id)
    }

    pub fn get_enum_option_name(&self, field_id: &str, option_id: &str) -> String {
        self.state.lock().info.enum_option_name(field_id, option_id)
    }

    pub fn get_card_info(&self, card_id: &str) -> Option<CardInfo> {
        self.state.lock().info.card(card_id)
    }

    pub fn get_card_label(&self, card_id: &str) -> String {
        self.state.lock().info.card_label(card_id)
    }

    pub fn get_status_name(&self, status_id: &str) -> String {
        self.state.lock().info.status_name(status_id)
    }

    // local pushes for ids introduced while editing

    pub fn add_field_name(&self, field_id: impl Into<String>, name: impl Into<String>) {
        self.state
            .lock()
            .info
            .field_names
            .insert(field_id.into(), name.into());
    }

    pub fn add_field_names<I>(&self, names: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.state.lock().info.field_names.extend(names);
    }

    pub fn add_link_field_name(&self, link_field_id: impl Into<String>, name: impl Into<String>) {
        self.state
            .lock()
            .info
            .link_field_names
            .insert(link_field_id.into(), name.into());
    }

    pub fn add_link_field_names<I>(&self, names: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.state.lock().info.link_field_names.extend(names);
    }

    pub fn add_enum_options(&self, field_id: impl Into<String>, options: Vec<EnumOption>) {
        self.state
            .lock()
            .info
            .enum_options
            .insert(field_id.into(), options);
    }

    pub fn add_card(&self, card: CardInfo) {
        self.state.lock().info.cards.insert(card.id.clone(), card);
    }

    pub fn add_status_name(&self, status_id: impl Into<String>, name: impl Into<String>) {
        self.state
            .lock()
            .info
            .status_names
            .insert(status_id.into(), name.into());
    }
}
