//! Shared types passed between the pipeline and its collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about a git commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Commit message (first line)
    pub message: String,
    /// Full commit message body
    pub body: Option<String>,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// Create a new CommitInfo
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        author_email: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            message: message.into(),
            body: None,
            author: author.into(),
            author_email: author_email.into(),
            timestamp,
        }
    }

    /// Set the commit body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    /// Get the full message including body
    pub fn full_message(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n\n{}", self.message, body),
            None => self.message.clone(),
        }
    }
}

/// An issue-tracker ticket with the commits that reference it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket key (e.g. "PROJ-123")
    pub key: String,
    /// Ticket title
    pub summary: String,
    /// Issue type name (Story, Bug, ...)
    pub issue_type: String,
    /// Workflow status name
    pub status: Option<String>,
    /// Project key the ticket belongs to
    pub project_key: String,
    /// Browse URL, when the tracker host is known
    pub url: Option<String>,
    /// Names of the versions the ticket is fixed in
    #[serde(default)]
    pub fix_versions: Vec<String>,
    /// Commits that mention this ticket
    #[serde(default)]
    pub commits: Vec<CommitInfo>,
}

impl Ticket {
    /// Create a ticket from its key alone
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let project_key = key
            .split_once('-')
            .map(|(project, _)| project.to_string())
            .unwrap_or_else(|| key.clone());

        Self {
            key,
            summary: String::new(),
            issue_type: "Uncategorized".to_string(),
            status: None,
            project_key,
            url: None,
            fix_versions: Vec::new(),
            commits: Vec::new(),
        }
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the issue type
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the browse URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A release version created or found in the issue tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseVersion {
    /// Tracker-side identifier
    pub id: String,
    /// Version name (the release name)
    pub name: String,
    /// Project the version belongs to
    pub project_key: String,
    /// Whether the version is marked released
    #[serde(default)]
    pub released: bool,
    /// Link to the version page
    pub url: Option<String>,
}

/// Tickets and commits matched for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangelogData {
    /// Release name, if any
    pub release: Option<String>,
    /// Tickets in order of first mention
    pub tickets: Vec<Ticket>,
    /// Commits that mention no known ticket
    pub commits_without_tickets: Vec<CommitInfo>,
    /// Total commits considered
    pub commit_count: usize,
}

/// Tickets sharing an issue type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketGroup {
    /// Issue type name
    pub issue_type: String,
    /// Tickets of this type
    pub tickets: Vec<Ticket>,
}

/// Everything a template needs to render a changelog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateData {
    /// Release name, if any
    pub release: Option<String>,
    /// Generation date (YYYY-MM-DD)
    pub date: String,
    /// Issue tracker base URL
    pub jira_base_url: Option<String>,
    /// Tickets grouped by issue type
    pub ticket_groups: Vec<TicketGroup>,
    /// Tickets not yet in an approved status
    pub pending_tickets: Vec<Ticket>,
    /// Commits that mention no ticket
    pub commits_without_tickets: Vec<CommitInfo>,
    /// Versions resolved in the tracker for this release
    pub release_versions: Vec<ReleaseVersion>,
    /// Number of tickets listed
    pub ticket_count: usize,
    /// Number of commits considered
    pub commit_count: usize,
}
