//! Error types for ticketlog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TicketlogError
pub type Result<T> = std::result::Result<T, TicketlogError>;

/// Main error type for ticketlog operations
#[derive(Debug, Error)]
pub enum TicketlogError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Commit range errors
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Issue tracker errors
    #[error(transparent)]
    Jira(#[from] JiraError),

    /// Template and rendering errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Chat delivery errors
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Command hook errors
    #[error(transparent)]
    Hook(#[from] HookError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// A ref in the range could not be resolved
    #[error("Cannot resolve '{0}' to a commit")]
    RefNotFound(String),

    /// The resolved range cannot be turned into a log query
    #[error("Invalid commit range: {0}")]
    InvalidRange(String),

    /// A date bound could not be parsed
    #[error("Invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Commit range errors
#[derive(Debug, Error)]
pub enum RangeError {
    /// The range expression could not be decomposed
    #[error("Invalid range '{0}': expected <ref>, <from>..<to> or <from>...<to>")]
    InvalidRange(String),

    /// No source yielded a usable range
    #[error("No range defined: pass --range or --date, configure source_control.default_range, or create tags")]
    NoRangeDefined,
}

/// Issue tracker errors
#[derive(Debug, Error)]
pub enum JiraError {
    /// Missing credentials or host
    #[error("Jira is not configured: {0}")]
    NotConfigured(String),

    /// API error from Jira
    #[error("Jira API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Invalid ticket pattern
    #[error("Invalid ticket ID pattern: {0}")]
    InvalidPattern(String),

    /// HTTP transport error
    #[error("Jira request failed: {0}")]
    Request(String),
}

/// Template and rendering errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file not found
    #[error("Template not found at {0}")]
    NotFound(PathBuf),

    /// Data transform produced unusable output
    #[error("Template data transform returned invalid data: {0}")]
    InvalidTransform(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chat delivery errors
#[derive(Debug, Error)]
pub enum ChatError {
    /// Chat requested but client disabled or no channel
    #[error("Chat delivery is not configured: {0}")]
    NotConfigured(String),

    /// Posting the message failed
    #[error("Failed to deliver message to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    /// API error from the chat service
    #[error("Chat API error: {0}")]
    ApiError(String),
}

/// Command hook errors
#[derive(Debug, Error)]
pub enum HookError {
    /// Hook could not be spawned or exited non-zero
    #[error("Hook '{command}' failed: {message}")]
    ExecutionFailed { command: String, message: String },

    /// Hook exceeded its timeout
    #[error("Hook '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// Hook produced no output where a value was required
    #[error("Hook '{0}' produced no output")]
    EmptyOutput(String),
}

impl TicketlogError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
