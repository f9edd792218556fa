mod schema;

pub use schema::{
    Config, EditorSettings, ResolverSettings, DEFAULT_BASE_URL, DEFAULT_MAX_GROUP_DEPTH,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::conditions::GroupOperator;

const CONFIG_ENV_VAR: &str = "CONDCTL_CONFIG";
const API_URL_ENV_VAR: &str = "CONDCTL_API_URL";

/// `--config` wins over `CONDCTL_CONFIG`, which wins over `~/.condctl/config.json`
pub fn get_config_path_with_override(override_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(expand(path));
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Ok(expand(&path));
        }
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".condctl").join("config.json"))
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// load config from `path`, falling back to defaults when the file is missing
pub fn load(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        json5::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        log::debug!("no config at {}, using defaults", path.display());
        Config::default()
    };

    apply_api_url_override(&mut config, env::var(API_URL_ENV_VAR).ok());
    Ok(config)
}

fn apply_api_url_override(config: &mut Config, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        log::debug!("{} overrides resolver.base_url", API_URL_ENV_VAR);
        config.resolver.base_url = url;
    }
}

pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// overwrite the file at `path` with defaults
pub fn reset(path: &Path) -> Result<Config> {
    let config = Config::default();
    save(&config, path)?;
    Ok(config)
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match json5::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    Ok(validate(&config))
}

/// semantic checks on an already-decoded config
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    let base_url = config.resolver.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(format!(
            "resolver.base_url: expected an http(s) URL, got '{}'",
            config.resolver.base_url
        ));
    }

    if config.resolver.timeout_secs == 0 {
        errors.push("resolver.timeout_secs: must be greater than 0".to_string());
    }

    if config.resolver.user_agent.trim().is_empty() {
        errors.push("resolver.user_agent: must not be empty".to_string());
    }

    if config.editor.max_group_depth == 0 {
        errors.push("editor.max_group_depth: must be at least 1".to_string());
    }

    errors
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["resolver", "base_url"] => {
            config.resolver.base_url = value.to_string();
        }
        ["resolver", "timeout_secs"] => {
            config.resolver.timeout_secs = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        ["resolver", "user_agent"] => {
            config.resolver.user_agent = value.to_string();
        }
        ["resolver", "auth_token"] => {
            config.resolver.auth_token = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
        ["editor", "max_group_depth"] => {
            config.editor.max_group_depth = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        ["editor", "default_group_operator"] => {
            config.editor.default_group_operator = GroupOperator::parse(value).ok_or_else(|| {
                anyhow!("Invalid default_group_operator: {}. Use AND or OR", value)
            })?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: resolver.base_url, resolver.timeout_secs, resolver.user_agent, resolver.auth_token, editor.max_group_depth, editor.default_group_operator",
                key
            ));
        }
    }

    Ok(())
}
