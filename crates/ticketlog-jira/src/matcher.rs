//! Ticket key extraction from commit messages

use regex::Regex;

use ticketlog_core::error::JiraError;
use ticketlog_core::CommitInfo;

/// Finds ticket keys in commit messages
#[derive(Debug, Clone)]
pub struct TicketMatcher {
    pattern: Regex,
}

impl TicketMatcher {
    /// Create a matcher from a ticket key pattern
    pub fn new(pattern: &str) -> Result<Self, JiraError> {
        let pattern =
            Regex::new(pattern).map_err(|e| JiraError::InvalidPattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Keys mentioned in a commit's summary and body, first mention first
    pub fn keys_in(&self, commit: &CommitInfo) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for found in self.pattern.find_iter(&commit.full_message()) {
            if !keys.iter().any(|k| k == found.as_str()) {
                keys.push(found.as_str().to_string());
            }
        }
        keys
    }

    /// Keys across all commits, first mention first
    pub fn keys_across(&self, commits: &[CommitInfo]) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for commit in commits {
            for key in self.keys_in(commit) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ticketlog_core::config::DEFAULT_TICKET_ID_PATTERN;

    fn commit(message: &str, body: &str) -> CommitInfo {
        CommitInfo::new("abc1234", message, "Dev", "dev@example.com", Utc::now()).with_body(body)
    }

    #[test]
    fn test_keys_in_summary_and_body() {
        let matcher = TicketMatcher::new(DEFAULT_TICKET_ID_PATTERN).unwrap();
        let keys = matcher.keys_in(&commit("PROJ-12 fix login", "Also touches OPS-3 and PROJ-12"));
        assert_eq!(keys, vec!["PROJ-12", "OPS-3"]);
    }

    #[test]
    fn test_no_keys() {
        let matcher = TicketMatcher::new(DEFAULT_TICKET_ID_PATTERN).unwrap();
        assert!(matcher.keys_in(&commit("tidy imports", "")).is_empty());
        assert!(matcher.keys_in(&commit("bump to utf-8", "")).is_empty());
    }

    #[test]
    fn test_keys_across_commits() {
        let matcher = TicketMatcher::new(DEFAULT_TICKET_ID_PATTERN).unwrap();
        let commits = vec![
            commit("PROJ-2 second", ""),
            commit("PROJ-1 first", ""),
            commit("PROJ-2 again", ""),
        ];
        assert_eq!(matcher.keys_across(&commits), vec!["PROJ-2", "PROJ-1"]);
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = TicketMatcher::new(r"#\d+").unwrap();
        assert_eq!(matcher.keys_in(&commit("Fix #42", "")), vec!["#42"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            TicketMatcher::new("[A-Z"),
            Err(JiraError::InvalidPattern(_))
        ));
    }
}
