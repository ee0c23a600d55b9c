//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::hooks::CommandHook;

use super::defaults::{
    DEFAULT_HOOK_TIMEOUT_SECS, DEFAULT_JIRA_EMAIL_ENV, DEFAULT_JIRA_TOKEN_ENV,
    DEFAULT_SLACK_TOKEN_ENV, DEFAULT_TICKET_ID_PATTERN,
};

/// Main configuration for ticketlog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository path, set at runtime
    #[serde(skip)]
    pub git_path: Option<PathBuf>,

    /// Write the changelog to `<cwd>/changelog/`
    pub save: bool,

    /// Optional `{{variable}}` template file
    pub template: Option<PathBuf>,

    /// Source control configuration
    pub source_control: SourceControlConfig,

    /// Jira configuration
    pub jira: JiraConfig,

    /// Slack configuration
    pub slack: SlackConfig,

    /// Hook that rewrites the message before it is posted to Slack
    pub transform_for_slack: Option<CommandHook>,

    /// Hook that rewrites template data before rendering
    pub transform_data: Option<CommandHook>,

    /// Timeout for hooks that do not set their own
    pub hook_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_path: None,
            save: false,
            template: None,
            source_control: SourceControlConfig::default(),
            jira: JiraConfig::default(),
            slack: SlackConfig::default(),
            transform_for_slack: None,
            transform_data: None,
            hook_timeout_secs: DEFAULT_HOOK_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Directory hooks and git run in
    pub fn working_dir(&self) -> PathBuf {
        self.git_path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Source control configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceControlConfig {
    /// Range used when neither `--range` nor `--date` is given
    pub default_range: Option<DefaultRange>,
}

/// A partially specified commit range from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultRange {
    /// Start ref
    pub from: Option<String>,
    /// End ref
    pub to: Option<String>,
    /// Symmetric difference instead of `from..to`
    pub symmetric: Option<bool>,
    /// Only commits after this date
    pub after: Option<String>,
    /// Only commits before this date
    pub before: Option<String>,
}

impl DefaultRange {
    /// Number of fields that are set
    pub fn key_count(&self) -> usize {
        [
            self.from.is_some(),
            self.to.is_some(),
            self.symmetric.is_some(),
            self.after.is_some(),
            self.before.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Jira configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// API connection settings
    pub api: JiraApiConfig,

    /// Regex matching ticket keys in commit messages
    pub ticket_id_pattern: String,

    /// Issue types left out of the changelog
    pub exclude_issue_types: Vec<String>,

    /// Statuses that count as approved; others are listed as pending
    pub approval_statuses: Vec<String>,

    /// Create the release version and add it to each ticket
    pub assign_release_versions: bool,

    /// Hook printing the next release name
    pub generate_release_version_name: Option<CommandHook>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            api: JiraApiConfig::default(),
            ticket_id_pattern: DEFAULT_TICKET_ID_PATTERN.to_string(),
            exclude_issue_types: vec!["Sub-task".to_string()],
            approval_statuses: vec![
                "Done".to_string(),
                "Closed".to_string(),
                "Accepted".to_string(),
            ],
            assign_release_versions: true,
            generate_release_version_name: None,
        }
    }
}

/// Jira API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraApiConfig {
    /// Jira host (e.g. "example.atlassian.net")
    pub host: Option<String>,
    /// Account email
    pub email: Option<String>,
    /// API token
    pub token: Option<String>,
    /// Environment variable holding the email
    pub email_env: String,
    /// Environment variable holding the API token
    pub token_env: String,
}

impl Default for JiraApiConfig {
    fn default() -> Self {
        Self {
            host: None,
            email: None,
            token: None,
            email_env: DEFAULT_JIRA_EMAIL_ENV.to_string(),
            token_env: DEFAULT_JIRA_TOKEN_ENV.to_string(),
        }
    }
}

impl JiraApiConfig {
    /// Base URL for the configured host
    pub fn base_url(&self) -> Option<String> {
        let host = self.host.as_deref()?.trim().trim_end_matches('/');
        if host.is_empty() {
            return None;
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Some(host.to_string())
        } else {
            Some(format!("https://{}", host))
        }
    }

    /// Email from config, falling back to the environment
    pub fn resolve_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| std::env::var(&self.email_env).ok())
            .filter(|v| !v.is_empty())
    }

    /// Token from config, falling back to the environment
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|v| !v.is_empty())
    }
}

/// Slack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Bot token
    pub api_token: Option<String>,
    /// Environment variable holding the bot token
    pub token_env: String,
    /// Channel to post to
    pub channel: Option<String>,
    /// Display name for the bot
    pub username: Option<String>,
    /// Emoji icon for the bot
    pub icon_emoji: Option<String>,
    /// Convert markdown links and headings to Slack markup
    pub convert_markdown: bool,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            token_env: DEFAULT_SLACK_TOKEN_ENV.to_string(),
            channel: None,
            username: None,
            icon_emoji: None,
            convert_markdown: true,
        }
    }
}

impl SlackConfig {
    /// Token from config, falling back to the environment
    pub fn resolve_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|v| !v.is_empty())
    }
}
