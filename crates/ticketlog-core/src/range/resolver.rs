//! Commit range resolution

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{RangeError, Result};
use crate::traits::SourceControl;
use crate::workflow::RunOptions;

/// A range ready to be handed to the source control backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    /// Start ref
    pub from: Option<String>,
    /// End ref
    pub to: Option<String>,
    /// Symmetric difference instead of `from..to`
    pub symmetric: bool,
    /// Only commits after this date
    pub after: Option<String>,
    /// Only commits before this date
    pub before: Option<String>,
}

/// Range being accumulated from the different sources
#[derive(Debug, Default)]
struct RangeDraft {
    from: Option<String>,
    to: Option<String>,
    symmetric: Option<bool>,
    after: Option<String>,
    before: Option<String>,
}

impl RangeDraft {
    fn key_count(&self) -> usize {
        [
            self.from.is_some(),
            self.to.is_some(),
            self.symmetric.is_some(),
            self.after.is_some(),
            self.before.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    fn infer_from_tags(&mut self, tags: &[String]) {
        let index_of = |name: &str| -> isize {
            tags.iter()
                .position(|tag| tag == name)
                .map_or(-1, |i| i as isize)
        };
        let tag_at = |index: isize| -> Option<String> {
            usize::try_from(index)
                .ok()
                .and_then(|i| tags.get(i))
                .cloned()
        };

        if let Some(from) = &self.from {
            self.to = tag_at(index_of(from) + 1);
        } else if let Some(to) = &self.to {
            self.from = tag_at(index_of(to) - 1);
        } else {
            let len = tags.len() as isize;
            self.from = tag_at(len - 2);
            self.to = tag_at(len - 1);
        }
    }

    fn finish(self) -> ResolvedRange {
        ResolvedRange {
            from: self.from,
            to: self.to,
            symmetric: self.symmetric.unwrap_or(false),
            after: self.after,
            before: self.before,
        }
    }
}

/// Combine the CLI range and date, the configured default range and the
/// repository tags into one range.
///
/// Tags are only consulted when fewer than two fields are known. Lookups
/// that fall outside the tag list leave the endpoint unset.
#[instrument(skip_all)]
pub async fn resolve_range(
    config: &Config,
    options: &RunOptions,
    source_control: &dyn SourceControl,
) -> Result<ResolvedRange> {
    let mut draft = RangeDraft::default();

    if let Some(range) = options.range.as_ref().filter(|r| !r.from.is_empty()) {
        debug!(from = %range.from, to = %range.to, symmetric = range.symmetric, "using range flag");
        draft.symmetric = Some(range.symmetric);
        draft.from = Some(range.from.clone());
        draft.to = Some(range.to.clone());
    }

    if let Some(dates) = options.date_range.as_ref().filter(|r| !r.from.is_empty()) {
        debug!(after = %dates.from, before = %dates.to, "using date flag");
        draft.after = Some(dates.from.clone());
        if !dates.to.is_empty() {
            draft.before = Some(dates.to.clone());
        }
    }

    if draft.key_count() == 0 {
        if let Some(default) = config
            .source_control
            .default_range
            .as_ref()
            .filter(|d| d.key_count() > 0)
        {
            debug!(?default, "using configured default range");
            draft.from = default.from.clone();
            draft.to = default.to.clone();
            draft.symmetric = default.symmetric;
            draft.after = default.after.clone();
            draft.before = default.before.clone();
        }
    }

    if draft.key_count() < 2 {
        let tags = source_control.list_tags().await?;
        debug!(tag_count = tags.len(), "inferring range from tags");
        draft.infer_from_tags(&tags);
    }

    if draft.key_count() == 0 {
        return Err(RangeError::NoRangeDefined.into());
    }

    let resolved = draft.finish();
    info!(
        from = ?resolved.from,
        to = ?resolved.to,
        symmetric = resolved.symmetric,
        after = ?resolved.after,
        before = ?resolved.before,
        "resolved commit range"
    );
    Ok(resolved)
}
