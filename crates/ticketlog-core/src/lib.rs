//! Ticketlog Core - Core library for changelog generation
//!
//! This crate provides the error types, configuration, commit-range
//! resolution, command hooks, collaborator traits and the pipeline that
//! turns a commit range into a rendered changelog.

pub mod config;
pub mod error;
pub mod hooks;
pub mod range;
pub mod traits;
pub mod types;
pub mod workflow;

pub use config::{Config, DefaultRange};
pub use error::{
    ChatError, ConfigError, GitError, HookError, JiraError, RangeError, Result, TemplateError,
    TicketlogError,
};
pub use hooks::{CommandHook, HookContext};
pub use range::{parse_range, resolve_range, RangeSpec, ResolvedRange};
pub use traits::{ChangelogRenderer, ChatClient, IssueTracker, SourceControl};
pub use types::{ChangelogData, CommitInfo, ReleaseVersion, TemplateData, Ticket, TicketGroup};
pub use workflow::{deliver, ChangelogPipeline, PipelineOutcome, ReleaseRequest, RunOptions};
