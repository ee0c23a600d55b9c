//! Jira REST API payloads

use serde::{Deserialize, Serialize};

/// `GET /rest/api/2/issue/{key}` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: Option<Named>,
    #[serde(rename = "issuetype")]
    pub issue_type: Option<Named>,
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub fix_versions: Vec<Named>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProjectRef {
    pub key: String,
}

/// Project version as returned by the versions endpoints
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Version {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub released: bool,
}

/// `POST /rest/api/2/version` body
#[derive(Debug, Serialize)]
pub(crate) struct CreateVersion<'a> {
    pub name: &'a str,
    pub project: &'a str,
}
