//! Jira issue tracker client
//!
//! ## Authentication
//!
//! Requests use basic auth with the account email and an API token, taken
//! from the config or from the environment variables it names
//! (`JIRA_EMAIL` and `JIRA_API_TOKEN` by default).
//!
//! Without a configured host the client works offline: tickets are built
//! from their keys alone and no release versions are created.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use url::Url;

use ticketlog_core::config::JiraConfig;
use ticketlog_core::error::{JiraError, Result};
use ticketlog_core::{ChangelogData, CommitInfo, IssueTracker, ReleaseVersion, Ticket};

use crate::api::{CreateVersion, Issue, Version};
use crate::matcher::TicketMatcher;

/// Request timeout for Jira API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Issue fields requested for each ticket
const ISSUE_FIELDS: &str = "summary,status,issuetype,project,fixVersions";

fn request_error(e: reqwest::Error) -> JiraError {
    JiraError::Request(e.to_string())
}

/// Jira issue tracker
pub struct JiraClient {
    config: JiraConfig,
    base_url: Option<Url>,
    credentials: Option<(String, String)>,
    matcher: TicketMatcher,
    client: Client,
    release_versions: Mutex<Vec<ReleaseVersion>>,
}

impl JiraClient {
    /// Create a client from configuration
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let base_url = config
            .api
            .base_url()
            .map(|base| {
                Url::parse(&base).map_err(|e| {
                    JiraError::NotConfigured(format!("invalid host '{}': {}", base, e))
                })
            })
            .transpose()?;

        let credentials = match (config.api.resolve_email(), config.api.resolve_token()) {
            (Some(email), Some(token)) => Some((email, token)),
            _ => {
                if base_url.is_some() {
                    warn!(
                        email_env = %config.api.email_env,
                        token_env = %config.api.token_env,
                        "Jira credentials not found, sending unauthenticated requests"
                    );
                }
                None
            }
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("ticketlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(request_error)?;

        Ok(Self {
            config: config.clone(),
            base_url,
            credentials,
            matcher: TicketMatcher::new(&config.ticket_id_pattern)?,
            client,
            release_versions: Mutex::new(Vec::new()),
        })
    }

    /// Whether a Jira host is configured
    pub fn is_online(&self) -> bool {
        self.base_url.is_some()
    }

    fn versions(&self) -> MutexGuard<'_, Vec<ReleaseVersion>> {
        self.release_versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn url(&self, base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| JiraError::NotConfigured(format!("'{}' cannot be used as a base URL", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn api_url(&self, base: &Url, segments: &[&str]) -> Result<Url> {
        let mut full = vec!["rest", "api", "2"];
        full.extend_from_slice(segments);
        self.url(base, &full)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((email, token)) => request.basic_auth(email, Some(token)),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(JiraError::ApiError {
                status: status.as_u16(),
                message: error_text,
            }
            .into());
        }
        Ok(response)
    }

    /// Fetch a ticket; `None` when Jira does not know the key
    #[instrument(skip(self, base))]
    async fn fetch_ticket(&self, base: &Url, key: &str) -> Result<Option<Ticket>> {
        let url = self.api_url(base, &["issue", key])?;
        debug!(%url, "fetching issue");

        let response = self
            .authorize(self.client.get(url))
            .query(&[("fields", ISSUE_FIELDS)])
            .send()
            .await
            .map_err(request_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            warn!(key, "ticket not found in Jira, leaving its commits unmatched");
            return Ok(None);
        }

        let issue: Issue = Self::check(response)
            .await?
            .json()
            .await
            .map_err(request_error)?;

        let browse = self.url(base, &["browse", &issue.key])?;
        let fields = issue.fields;
        let mut ticket = Ticket::new(issue.key)
            .with_summary(fields.summary)
            .with_url(browse.to_string());
        if let Some(issue_type) = fields.issue_type {
            ticket = ticket.with_issue_type(issue_type.name);
        }
        if let Some(status) = fields.status {
            ticket = ticket.with_status(status.name);
        }
        if let Some(project) = fields.project {
            ticket.project_key = project.key;
        }
        ticket.fix_versions = fields.fix_versions.into_iter().map(|v| v.name).collect();

        Ok(Some(ticket))
    }

    /// Find the project version with this name, creating it if missing
    #[instrument(skip(self, base))]
    async fn find_or_create_version(
        &self,
        base: &Url,
        project: &str,
        name: &str,
    ) -> Result<ReleaseVersion> {
        let url = self.api_url(base, &["project", project, "versions"])?;
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(request_error)?;
        let existing: Vec<Version> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(request_error)?;

        let version = match existing.into_iter().find(|v| v.name == name) {
            Some(version) => {
                debug!(id = %version.id, "release version exists");
                version
            }
            None => {
                let url = self.api_url(base, &["version"])?;
                let response = self
                    .authorize(self.client.post(url))
                    .json(&CreateVersion { name, project })
                    .send()
                    .await
                    .map_err(request_error)?;
                let created: Version = Self::check(response)
                    .await?
                    .json()
                    .await
                    .map_err(request_error)?;
                info!(id = %created.id, "created release version");
                created
            }
        };

        let page = self.url(base, &["projects", project, "versions", &version.id])?;
        Ok(ReleaseVersion {
            id: version.id,
            name: version.name,
            project_key: project.to_string(),
            released: version.released,
            url: Some(page.to_string()),
        })
    }

    #[instrument(skip(self, base))]
    async fn add_fix_version(&self, base: &Url, key: &str, version: &str) -> Result<()> {
        let url = self.api_url(base, &["issue", key])?;
        let body = json!({ "update": { "fixVersions": [{ "add": { "name": version } }] } });

        let response = self
            .authorize(self.client.put(url))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        Self::check(response).await?;

        debug!(key, version, "added fix version");
        Ok(())
    }

    /// Create or find the release version in each project and add it to the
    /// tickets
    async fn assign_release(
        &self,
        base: &Url,
        release: &str,
        tickets: &mut [Ticket],
    ) -> Result<Vec<ReleaseVersion>> {
        let mut projects: Vec<String> = Vec::new();
        for ticket in tickets.iter() {
            if !projects.contains(&ticket.project_key) {
                projects.push(ticket.project_key.clone());
            }
        }

        let mut versions = Vec::with_capacity(projects.len());
        for project in &projects {
            let version = self.find_or_create_version(base, project, release).await?;

            for ticket in tickets.iter_mut().filter(|t| &t.project_key == project) {
                if ticket.fix_versions.iter().any(|v| v == release) {
                    continue;
                }
                self.add_fix_version(base, &ticket.key, release).await?;
                ticket.fix_versions.push(release.to_string());
            }

            versions.push(version);
        }

        Ok(versions)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    #[instrument(skip(self, commits), fields(commits = commits.len(), online = self.is_online()))]
    async fn generate(
        &self,
        commits: &[CommitInfo],
        release: Option<&str>,
    ) -> Result<ChangelogData> {
        let keys = self.matcher.keys_across(commits);
        debug!(keys = keys.len(), "found ticket keys");

        let mut tickets: Vec<Ticket> = Vec::new();
        let mut index_by_key: HashMap<String, usize> = HashMap::new();
        for key in keys {
            let ticket = match &self.base_url {
                Some(base) => self.fetch_ticket(base, &key).await?,
                None => Some(Ticket::new(key.as_str())),
            };
            let Some(ticket) = ticket else { continue };

            // Moved issues come back under their new key
            let index = match tickets.iter().position(|t| t.key == ticket.key) {
                Some(index) => index,
                None => {
                    tickets.push(ticket);
                    tickets.len() - 1
                }
            };
            index_by_key.insert(key, index);
        }

        let mut commits_without_tickets = Vec::new();
        for commit in commits {
            let mut matched = false;
            for key in self.matcher.keys_in(commit) {
                if let Some(&index) = index_by_key.get(&key) {
                    let ticket = &mut tickets[index];
                    if !ticket.commits.iter().any(|c| c.hash == commit.hash) {
                        ticket.commits.push(commit.clone());
                    }
                    matched = true;
                }
            }
            if !matched {
                commits_without_tickets.push(commit.clone());
            }
        }

        let versions = match (release, &self.base_url) {
            (Some(release), Some(base)) if self.config.assign_release_versions => {
                self.assign_release(base, release, &mut tickets).await?
            }
            (Some(_), None) => {
                debug!("offline, skipping release versions");
                Vec::new()
            }
            _ => Vec::new(),
        };
        *self.versions() = versions;

        info!(
            tickets = tickets.len(),
            unmatched = commits_without_tickets.len(),
            "matched commits to tickets"
        );

        Ok(ChangelogData {
            release: release.map(str::to_string),
            tickets,
            commits_without_tickets,
            commit_count: commits.len(),
        })
    }

    fn release_versions(&self) -> Vec<ReleaseVersion> {
        self.versions().clone()
    }
}
