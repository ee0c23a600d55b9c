//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "ticketlog.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "ticketlog.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".ticketlog.yaml";

/// Default ticket key pattern
pub const DEFAULT_TICKET_ID_PATTERN: &str = "[A-Z][A-Z0-9]+-[0-9]+";

/// Default environment variable for the Jira email
pub const DEFAULT_JIRA_EMAIL_ENV: &str = "JIRA_EMAIL";

/// Default environment variable for the Jira API token
pub const DEFAULT_JIRA_TOKEN_ENV: &str = "JIRA_API_TOKEN";

/// Default environment variable for the Slack bot token
pub const DEFAULT_SLACK_TOKEN_ENV: &str = "SLACK_API_TOKEN";

/// Default hook timeout
pub const DEFAULT_HOOK_TIMEOUT_SECS: u64 = 60;

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".ticketlog.toml",
    ]
}
