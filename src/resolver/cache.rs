//! the display-info payload and its in-memory lookups

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// one selectable option of an enum field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl EnumOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
        }
    }
}

/// label of a referenced card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: String,
    pub code: String,
    pub title: String,
}

impl CardInfo {
    pub fn new(id: impl Into<String>, code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            title: title.into(),
        }
    }

    /// `CODE title`, or just the code when the title is blank
    pub fn label(&self) -> String {
        if self.title.trim().is_empty() {
            self.code.clone()
        } else {
            format!("{} {}", self.code, self.title)
        }
    }
}

/// names for every id referenced by a condition, as returned by
/// `POST /conditions/display-info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    #[serde(default)]
    pub field_names: HashMap<String, String>,
    /// keyed by composite link-field key
    #[serde(default)]
    pub link_field_names: HashMap<String, String>,
    /// keyed by field id
    #[serde(default)]
    pub enum_options: HashMap<String, Vec<EnumOption>>,
    #[serde(default)]
    pub cards: HashMap<String, CardInfo>,
    #[serde(default)]
    pub status_names: HashMap<String, String>,
}

impl DisplayInfo {
    pub fn field_name(&self, id: &str) -> String {
        self.field_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn link_field_name(&self, id: &str) -> String {
        self.link_field_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn status_name(&self, id: &str) -> String {
        self.status_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn enum_options(&self, field_id: &str) -> Vec<EnumOption> {
        self.enum_options.get(field_id).cloned().unwrap_or_default()
    }

    /// name of one option of `field_id`, falling back to the option id
    pub fn enum_option_name(&self, field_id: &str, option_id: &str) -> String {
        self.enum_options
            .get(field_id)
            .and_then(|options| options.iter().find(|o| o.id == option_id))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| option_id.to_string())
    }

    pub fn card(&self, id: &str) -> Option<CardInfo> {
        self.cards.get(id).cloned()
    }

    pub fn card_label(&self, id: &str) -> String {
        self.cards
            .get(id)
            .map(CardInfo::label)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.field_names.is_empty()
            && self.link_field_names.is_empty()
            && self.enum_options.is_empty()
            && self.cards.is_empty()
            && self.status_names.is_empty()
    }
}
