//! Commit history operations

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use ticketlog_core::error::GitError;
use ticketlog_core::{CommitInfo, ResolvedRange};

use crate::repository::{GitRepo, Result};

/// Parse a `YYYY-MM-DD` (midnight UTC) or RFC 3339 date
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| GitError::InvalidDate(value.to_string()))
}

impl GitRepo {
    /// Commits in a resolved range, newest first.
    ///
    /// The walk starts at `to` (or `HEAD` when `to` is unset or empty). An
    /// asymmetric range hides everything reachable from `from`; a symmetric
    /// range also walks `from` and hides only their merge base. `after` and
    /// `before` filter by commit time. Without `from`, `after` is required.
    #[instrument(skip(self))]
    pub fn commit_logs(&self, range: &ResolvedRange) -> Result<Vec<CommitInfo>> {
        let from = range.from.as_deref().filter(|f| !f.is_empty());
        if from.is_none() && range.after.is_none() {
            return Err(GitError::InvalidRange(
                "range has neither a start ref nor an after date".to_string(),
            ));
        }

        let after = range.after.as_deref().map(parse_date).transpose()?;
        let before = range.before.as_deref().map(parse_date).transpose()?;

        let tip_spec = range
            .to
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("HEAD");
        let tip = self.resolve_commit(tip_spec)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(tip)?;

        if let Some(from) = from {
            let start = self.resolve_commit(from)?;
            if range.symmetric {
                revwalk.push(start)?;
                match self.repo.merge_base(start, tip) {
                    Ok(base) => revwalk.hide(base)?,
                    Err(e) if e.code() == git2::ErrorCode::NotFound => {
                        debug!(from, to = tip_spec, "no merge base, walking both histories");
                    }
                    Err(e) => return Err(GitError::Git2(e)),
                }
            } else {
                revwalk.hide(start)?;
            }
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let info = commit_to_info(&commit);

            if after.is_some_and(|after| info.timestamp < after) {
                continue;
            }
            if before.is_some_and(|before| info.timestamp > before) {
                continue;
            }

            commits.push(info);
        }

        debug!(count = commits.len(), "collected commits in range");
        Ok(commits)
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let hash = commit.id().to_string();
    let author = commit.author();

    let message = commit.summary().unwrap_or("(no message)").to_string();

    let body = commit.body().map(|b| b.to_string());

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    CommitInfo::new(
        hash,
        message,
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or("unknown@example.com"),
        timestamp,
    )
    .with_body(body.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_at, init, tag, DAY, JAN_1_2024};
    use git2::{BranchType, Repository};

    fn range(from: Option<&str>, to: Option<&str>, symmetric: bool) -> ResolvedRange {
        ResolvedRange {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            symmetric,
            after: None,
            before: None,
        }
    }

    fn messages(commits: &[CommitInfo]) -> Vec<&str> {
        commits.iter().map(|c| c.message.as_str()).collect()
    }

    /// v1 -> PROJ-1 -> v2 -> PROJ-2 -> PROJ-3 (HEAD), one day apart
    fn linear_repo() -> (tempfile::TempDir, Repository) {
        let (temp, repo) = init();
        let v1 = commit_at(&repo, "initial", JAN_1_2024);
        tag(&repo, "v1", v1);
        commit_at(&repo, "PROJ-1 add login", JAN_1_2024 + DAY);
        let v2 = commit_at(&repo, "PROJ-1 fix login", JAN_1_2024 + 2 * DAY);
        tag(&repo, "v2", v2);
        commit_at(&repo, "PROJ-2 add logout", JAN_1_2024 + 3 * DAY);
        commit_at(&repo, "PROJ-3 audit log", JAN_1_2024 + 4 * DAY);
        (temp, repo)
    }

    #[test]
    fn test_asymmetric_range() {
        let (temp, _repo) = linear_repo();
        let git = GitRepo::open(temp.path()).unwrap();

        let commits = git.commit_logs(&range(Some("v1"), Some("v2"), false)).unwrap();
        assert_eq!(messages(&commits), vec!["PROJ-1 fix login", "PROJ-1 add login"]);
    }

    #[test]
    fn test_empty_to_means_head() {
        let (temp, _repo) = linear_repo();
        let git = GitRepo::open(temp.path()).unwrap();

        let commits = git.commit_logs(&range(Some("v2"), Some(""), false)).unwrap();
        assert_eq!(messages(&commits), vec!["PROJ-3 audit log", "PROJ-2 add logout"]);
    }

    #[test]
    fn test_symmetric_range_walks_both_sides() {
        let (temp, repo) = init();
        let base = commit_at(&repo, "base", JAN_1_2024);
        let base_commit = repo.find_commit(base).unwrap();
        repo.branch("feature", &base_commit, false).unwrap();

        commit_at(&repo, "PROJ-1 on main", JAN_1_2024 + DAY);

        repo.set_head("refs/heads/feature").unwrap();
        repo.checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
            .unwrap();
        commit_at(&repo, "PROJ-2 on feature", JAN_1_2024 + 2 * DAY);

        let main = repo
            .find_branch("master", BranchType::Local)
            .or_else(|_| repo.find_branch("main", BranchType::Local))
            .unwrap();
        let main_name = main.name().unwrap().unwrap().to_string();

        let git = GitRepo::open(temp.path()).unwrap();

        let symmetric = git
            .commit_logs(&range(Some(&main_name), Some("feature"), true))
            .unwrap();
        let mut found = messages(&symmetric);
        found.sort();
        assert_eq!(found, vec!["PROJ-1 on main", "PROJ-2 on feature"]);

        let asymmetric = git
            .commit_logs(&range(Some(&main_name), Some("feature"), false))
            .unwrap();
        assert_eq!(messages(&asymmetric), vec!["PROJ-2 on feature"]);
    }

    #[test]
    fn test_date_filters() {
        let (temp, _repo) = linear_repo();
        let git = GitRepo::open(temp.path()).unwrap();

        let mut dated = range(None, None, false);
        dated.after = Some("2024-01-03".to_string());
        dated.before = Some("2024-01-04T12:00:00Z".to_string());

        let commits = git.commit_logs(&dated).unwrap();
        assert_eq!(messages(&commits), vec!["PROJ-2 add logout", "PROJ-1 fix login"]);
    }

    #[test]
    fn test_missing_start_is_invalid() {
        let (temp, _repo) = linear_repo();
        let git = GitRepo::open(temp.path()).unwrap();

        let result = git.commit_logs(&range(None, Some("v2"), false));
        assert!(matches!(result, Err(GitError::InvalidRange(_))));
    }

    #[test]
    fn test_unknown_ref() {
        let (temp, _repo) = linear_repo();
        let git = GitRepo::open(temp.path()).unwrap();

        let result = git.commit_logs(&range(Some("v9"), None, false));
        assert!(matches!(result, Err(GitError::RefNotFound(r)) if r == "v9"));
    }

    #[test]
    fn test_commit_body() {
        let (temp, repo) = init();
        commit_at(&repo, "Fix crash\n\nRefs PROJ-9", JAN_1_2024);
        commit_at(&repo, "Follow up", JAN_1_2024 + DAY);
        let git = GitRepo::open(temp.path()).unwrap();

        let commits = git.commit_logs(&range(Some("HEAD~1"), None, false)).unwrap();
        assert_eq!(commits.len(), 1);

        let mut all = range(None, None, false);
        all.after = Some("2023-12-31".to_string());
        let commits = git.commit_logs(&all).unwrap();
        assert_eq!(commits[1].message, "Fix crash");
        assert_eq!(commits[1].body.as_deref(), Some("Refs PROJ-9"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-01").unwrap().timestamp(), JAN_1_2024);
        assert_eq!(
            parse_date("2024-01-01T01:00:00+01:00").unwrap().timestamp(),
            JAN_1_2024
        );
        assert!(matches!(
            parse_date("last tuesday"),
            Err(GitError::InvalidDate(_))
        ));
    }
}
