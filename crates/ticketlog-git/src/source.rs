//! Source control collaborator backed by a local repository

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use ticketlog_core::{CommitInfo, ResolvedRange, Result, SourceControl};

use crate::repository::GitRepo;

/// Git source control for the repository containing `path`
#[derive(Debug, Clone)]
pub struct GitSourceControl {
    path: PathBuf,
}

impl GitSourceControl {
    /// Create a source control backend rooted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceControl for GitSourceControl {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn list_tags(&self) -> Result<Vec<String>> {
        let repo = GitRepo::discover(&self.path)?;
        Ok(repo.tag_names()?)
    }

    #[instrument(skip(self, range), fields(path = %path.display()))]
    async fn commit_logs(&self, path: &Path, range: &ResolvedRange) -> Result<Vec<CommitInfo>> {
        let repo = GitRepo::discover(path)?;
        Ok(repo.commit_logs(range)?)
    }
}
