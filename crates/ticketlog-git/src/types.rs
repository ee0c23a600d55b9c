//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about a git tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Commit time of the tagged commit
    pub commit_time: DateTime<Utc>,
    /// Tag message (for annotated tags)
    pub message: Option<String>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(
        name: impl Into<String>,
        commit_hash: impl Into<String>,
        commit_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            commit_hash: commit_hash.into(),
            commit_time,
            message: None,
        }
    }

    /// Set the tag message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
