//! Changelog pipeline orchestration

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{HookError, Result};
use crate::hooks::HookContext;
use crate::range::{resolve_range, RangeSpec, ResolvedRange};
use crate::traits::{ChangelogRenderer, ChatClient, IssueTracker, SourceControl};

use super::delivery::deliver;
use super::output::save_changelog;

/// How the release name is chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReleaseRequest {
    /// No release
    #[default]
    None,
    /// Release name given on the command line
    Explicit(String),
    /// Ask the configured hook for the release name
    Generate,
}

/// Options for a changelog run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit config file
    pub config_path: Option<PathBuf>,
    /// Commit range from `--range`
    pub range: Option<RangeSpec>,
    /// Date range from `--date`
    pub date_range: Option<RangeSpec>,
    /// Deliver to chat
    pub slack: bool,
    /// Release name request
    pub release: ReleaseRequest,
    /// Repository path
    pub path: Option<PathBuf>,
}

impl RunOptions {
    /// Set the commit range
    pub fn with_range(mut self, range: RangeSpec) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the release request
    pub fn with_release(mut self, release: ReleaseRequest) -> Self {
        self.release = release;
        self
    }
}

/// What a pipeline run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The changelog was produced
    Completed {
        /// Decoded changelog text
        text: String,
        /// File the changelog was saved to
        saved_to: Option<PathBuf>,
        /// Whether the changelog was posted to chat
        delivered: bool,
    },
    /// The run stopped early without error
    Skipped {
        /// Why nothing was produced
        reason: String,
    },
}

/// Runs one changelog generation from range resolution to delivery
pub struct ChangelogPipeline<'a> {
    config: &'a Config,
    source_control: &'a dyn SourceControl,
    tracker: &'a dyn IssueTracker,
    renderer: &'a dyn ChangelogRenderer,
    chat: &'a dyn ChatClient,
}

impl<'a> ChangelogPipeline<'a> {
    /// Create a new pipeline
    pub fn new(
        config: &'a Config,
        source_control: &'a dyn SourceControl,
        tracker: &'a dyn IssueTracker,
        renderer: &'a dyn ChangelogRenderer,
        chat: &'a dyn ChatClient,
    ) -> Self {
        Self {
            config,
            source_control,
            tracker,
            renderer,
            chat,
        }
    }

    /// Execute the pipeline.
    ///
    /// The decoded changelog is always written to `out`. Saved files go under
    /// `output_dir/changelog/`.
    #[instrument(skip_all, fields(slack = options.slack))]
    pub async fn execute(
        &self,
        options: &RunOptions,
        output_dir: &Path,
        out: &mut dyn Write,
    ) -> Result<PipelineOutcome> {
        let range = resolve_range(self.config, options, self.source_control).await?;

        let release = match &options.release {
            ReleaseRequest::None => None,
            ReleaseRequest::Explicit(name) => Some(name.clone()),
            ReleaseRequest::Generate => match self.generate_release_name(&range).await? {
                Some(name) => Some(name),
                None => {
                    warn!("release name generation requested but no hook is configured");
                    return Ok(PipelineOutcome::Skipped {
                        reason: "--release was given without a value but \
                                 jira.generate_release_version_name is not configured"
                            .to_string(),
                    });
                }
            },
        };

        let repo_path = self.config.working_dir();
        let commits = self.source_control.commit_logs(&repo_path, &range).await?;
        info!(commits = commits.len(), release = ?release, "fetched commit logs");

        let changelog = self
            .tracker
            .generate(&commits, release.as_deref())
            .await?;
        debug!(
            tickets = changelog.tickets.len(),
            unmatched = changelog.commits_without_tickets.len(),
            "generated changelog data"
        );

        let release_versions = self.tracker.release_versions();
        let template_data = self
            .renderer
            .template_data(self.config, &changelog, &release_versions)
            .await?;

        let rendered = self.renderer.render(self.config, &template_data).await?;
        let text = self.renderer.decode_entities(&rendered);

        writeln!(out, "{}", text)?;
        out.flush()?;

        let saved_to = if self.config.save {
            Some(save_changelog(output_dir, release.as_deref(), &text).await?)
        } else {
            None
        };

        if options.slack {
            deliver(self.config, self.chat, &template_data, &text).await?;
        }

        Ok(PipelineOutcome::Completed {
            text,
            saved_to,
            delivered: options.slack,
        })
    }

    /// Run the release name hook, if configured
    async fn generate_release_name(&self, range: &ResolvedRange) -> Result<Option<String>> {
        let Some(hook) = &self.config.jira.generate_release_version_name else {
            return Ok(None);
        };

        let input = serde_json::to_string(range)?;
        let context = HookContext::from_config(self.config).with_range(range);
        let output = hook.run(Some(&input), &context).await?;

        let name = output.trim();
        if name.is_empty() {
            return Err(HookError::EmptyOutput(hook.command.clone()).into());
        }

        info!(release = name, "generated release name");
        Ok(Some(name.to_string()))
    }
}
