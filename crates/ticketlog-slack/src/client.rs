//! Slack Web API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use ticketlog_core::config::SlackConfig;
use ticketlog_core::error::{ChatError, Result, TicketlogError};
use ticketlog_core::ChatClient;

use crate::markup::MarkupConverter;

/// Default Slack Web API base URL
pub const SLACK_API_BASE: &str = "https://slack.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_emoji: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts changelogs to Slack with a bot token
pub struct SlackClient {
    config: SlackConfig,
    token: Option<String>,
    api_base: String,
    markup: Option<MarkupConverter>,
    client: Client,
}

impl SlackClient {
    /// Create a client from configuration
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let markup = if config.convert_markdown {
            Some(MarkupConverter::new().map_err(|e| TicketlogError::other(e.to_string()))?)
        } else {
            None
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("ticketlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatError::ApiError(e.to_string()))?;

        Ok(Self {
            config: config.clone(),
            token: config.resolve_token(),
            api_base: SLACK_API_BASE.to_string(),
            markup,
            client,
        })
    }

    /// Use a different API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn prepare(&self, text: &str) -> String {
        match &self.markup {
            Some(markup) => markup.convert(text),
            None => text.to_string(),
        }
    }
}

#[async_trait]
impl ChatClient for SlackClient {
    fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    #[instrument(skip(self, text), fields(channel = %channel))]
    async fn post_message(&self, text: &str, channel: &str) -> Result<()> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ChatError::NotConfigured(format!("no Slack token in {}", self.config.token_env)))?;

        let text = self.prepare(text);
        let payload = PostMessage {
            channel,
            text: &text,
            username: self.config.username.as_deref(),
            icon_emoji: self.config.icon_emoji.as_deref(),
        };

        let url = format!("{}/chat.postMessage", self.api_base);
        debug!(url = %url, "posting message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatError::ApiError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError(format!("HTTP {}: {}", status, body)).into());
        }

        let result: ApiResponse = response
            .json()
            .await
            .map_err(|e| ChatError::ApiError(e.to_string()))?;
        if !result.ok {
            let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(ChatError::ApiError(reason).into());
        }

        info!("Posted changelog to Slack");
        Ok(())
    }
}
