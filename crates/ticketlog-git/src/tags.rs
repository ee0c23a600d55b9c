//! Tag operations

use chrono::{TimeZone, Utc};
use tracing::{debug, instrument, warn};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// Get all tags that point at commits, oldest first.
    ///
    /// Tags are ordered by the commit time of their target; tags on commits
    /// with the same time are ordered by name.
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut refs = Vec::new();
        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();
            refs.push((name, oid));
            true
        })?;

        let mut tags = Vec::with_capacity(refs.len());
        for (name, oid) in refs {
            let object = self.repo.find_object(oid, None)?;
            let commit = match object.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    warn!(tag = %name, error = %e, "skipping tag that does not point at a commit");
                    continue;
                }
            };

            let commit_time = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_else(Utc::now);
            let mut info = TagInfo::new(&name, commit.id().to_string(), commit_time);

            if let Some(message) = object.as_tag().and_then(|tag| tag.message()) {
                info = info.with_message(message.trim());
            }

            tags.push(info);
        }

        tags.sort_by(|a, b| {
            a.commit_time
                .cmp(&b.commit_time)
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Tag names, oldest first
    pub fn tag_names(&self) -> Result<Vec<String>> {
        Ok(self.tags()?.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_at, init, tag, DAY, JAN_1_2024};
    use git2::Signature;

    #[test]
    fn test_tags_sorted_by_commit_time() {
        let (temp, repo) = init();
        let first = commit_at(&repo, "first", JAN_1_2024);
        let second = commit_at(&repo, "second", JAN_1_2024 + DAY);
        let third = commit_at(&repo, "third", JAN_1_2024 + 2 * DAY);

        // Names sort opposite to history
        tag(&repo, "c-first", first);
        tag(&repo, "b-second", second);
        tag(&repo, "a-third", third);

        let git = GitRepo::open(temp.path()).unwrap();
        assert_eq!(
            git.tag_names().unwrap(),
            vec!["c-first", "b-second", "a-third"]
        );
    }

    #[test]
    fn test_same_commit_ordered_by_name() {
        let (temp, repo) = init();
        let oid = commit_at(&repo, "only", JAN_1_2024);
        tag(&repo, "v1.0.1", oid);
        tag(&repo, "v1.0.0", oid);

        let git = GitRepo::open(temp.path()).unwrap();
        assert_eq!(git.tag_names().unwrap(), vec!["v1.0.0", "v1.0.1"]);
    }

    #[test]
    fn test_annotated_tag() {
        let (temp, repo) = init();
        let oid = commit_at(&repo, "release", JAN_1_2024);
        let commit = repo.find_commit(oid).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        repo.tag("v2.0.0", commit.as_object(), &sig, "Release 2.0\n", false)
            .unwrap();

        let git = GitRepo::open(temp.path()).unwrap();
        let tags = git.tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v2.0.0");
        assert_eq!(tags[0].commit_hash, oid.to_string());
        assert_eq!(tags[0].message.as_deref(), Some("Release 2.0"));
    }

    #[test]
    fn test_no_tags() {
        let (temp, repo) = init();
        commit_at(&repo, "first", JAN_1_2024);

        let git = GitRepo::open(temp.path()).unwrap();
        assert!(git.tags().unwrap().is_empty());
    }
}
