use serde::{Deserialize, Serialize};

use crate::conditions::GroupOperator;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub editor: EditorSettings,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("condctl/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 3;

/// where display names for condition ids come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// sent as a bearer token when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            auth_token: None,
        }
    }
}

/// limits an editor applies when building conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// deepest group nesting allowed; the root group counts as 1
    #[serde(default = "default_max_group_depth")]
    pub max_group_depth: usize,
    #[serde(default)]
    pub default_group_operator: GroupOperator,
}

fn default_max_group_depth() -> usize {
    DEFAULT_MAX_GROUP_DEPTH
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
            default_group_operator: GroupOperator::And,
        }
    }
}
