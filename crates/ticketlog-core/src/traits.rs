//! Collaborator traits used by the pipeline

use std::path::Path;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::range::ResolvedRange;
use crate::types::{ChangelogData, CommitInfo, ReleaseVersion, TemplateData};

/// Version control backend
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Tag names in chronological order, oldest first
    async fn list_tags(&self) -> Result<Vec<String>>;

    /// Commits in the resolved range for the repository at `path`
    async fn commit_logs(&self, path: &Path, range: &ResolvedRange) -> Result<Vec<CommitInfo>>;
}

/// Issue tracker that matches commits to tickets
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Build changelog data from commits, optionally tagging a release
    async fn generate(&self, commits: &[CommitInfo], release: Option<&str>)
        -> Result<ChangelogData>;

    /// Release versions resolved by the last `generate` call
    fn release_versions(&self) -> Vec<ReleaseVersion>;
}

/// Template data builder and renderer
#[async_trait]
pub trait ChangelogRenderer: Send + Sync {
    /// Build the data handed to the template
    async fn template_data(
        &self,
        config: &Config,
        changelog: &ChangelogData,
        release_versions: &[ReleaseVersion],
    ) -> Result<TemplateData>;

    /// Render template data to text
    async fn render(&self, config: &Config, data: &TemplateData) -> Result<String>;

    /// Turn HTML entities in rendered output back into plain text
    fn decode_entities(&self, text: &str) -> String;
}

/// Chat service used for optional delivery
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Whether the client has what it needs to post
    fn is_enabled(&self) -> bool;

    /// Post a message to a channel
    async fn post_message(&self, text: &str, channel: &str) -> Result<()>;
}
