//! http source for the display-info endpoint

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{DisplayInfo, DisplayInfoSource, ResolveError};
use crate::conditions::Condition;
use crate::config::ResolverSettings;

pub const DISPLAY_INFO_ENDPOINT: &str = "/conditions/display-info";

#[derive(Debug, Serialize)]
struct DisplayInfoRequest<'a> {
    condition: &'a Condition,
}

/// fetches display info from the backend over HTTP
pub struct HttpDisplayInfoSource {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpDisplayInfoSource {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        auth_token: Option<String>,
    ) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, ResolveError> {
        Self::new(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
            &settings.user_agent,
            settings.auth_token.clone(),
        )
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, DISPLAY_INFO_ENDPOINT)
    }
}

#[async_trait]
impl DisplayInfoSource for HttpDisplayInfoSource {
    async fn fetch_display_info(&self, condition: &Condition) -> Result<DisplayInfo, ResolveError> {
        let url = self.endpoint_url();
        log::debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .json(&DisplayInfoRequest { condition });
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
