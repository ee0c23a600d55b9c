//! CLI definition and run handling

pub mod output;

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use ticketlog_changelog::TemplateRenderer;
use ticketlog_core::config::load_config_for;
use ticketlog_core::{parse_range, ChangelogPipeline, PipelineOutcome, ReleaseRequest, RunOptions};
use ticketlog_git::GitSourceControl;
use ticketlog_jira::JiraClient;
use ticketlog_slack::SlackClient;

/// Ticketlog - release changelogs from git commits and Jira tickets
#[derive(Debug, Parser)]
#[command(name = "ticketlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILEPATH")]
    pub config: Option<PathBuf>,

    /// Commit range: <ref>, <from>..<to> or <from>...<to>
    #[arg(short, long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Date range: <date> or <after>...<before>
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<String>,

    /// Post the changelog to Slack
    #[arg(short, long)]
    pub slack: bool,

    /// Release name; without a value the configured hook generates one
    #[arg(long, value_name = "RELEASE", num_args = 0..=1, default_missing_value = "")]
    pub release: Option<String>,

    /// Repository path (default: current directory)
    pub path: Option<PathBuf>,
}

impl Cli {
    /// Execute the CLI on a single-threaded runtime
    pub fn execute(self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run())
    }

    /// Build run options, resolving the repository path against `cwd`
    pub fn run_options(&self, cwd: &Path) -> anyhow::Result<RunOptions> {
        let range = self.range.as_deref().map(parse_range).transpose()?;
        let date_range = self.date.as_deref().map(parse_range).transpose()?;

        let release = match self.release.as_deref() {
            None => ReleaseRequest::None,
            Some("") => ReleaseRequest::Generate,
            Some(name) => ReleaseRequest::Explicit(name.to_string()),
        };

        let path = match &self.path {
            Some(path) => normalize_path(&cwd.join(path)),
            None => normalize_path(cwd),
        };

        Ok(RunOptions {
            config_path: self.config.clone(),
            range,
            date_range,
            slack: self.slack,
            release,
            path: Some(path),
        })
    }

    async fn run(self) -> anyhow::Result<()> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let options = self.run_options(&cwd)?;
        let repo_dir = options.path.clone().unwrap_or_else(|| cwd.clone());
        info!(path = %repo_dir.display(), slack = options.slack, "generating changelog");

        let config = load_config_for(options.config_path.as_deref(), &repo_dir)?;
        debug!(
            save = config.save,
            template = ?config.template,
            jira_host = ?config.jira.api.host,
            "loaded config"
        );

        let source_control = GitSourceControl::new(&repo_dir);
        let tracker = JiraClient::new(&config.jira)?;
        let renderer = TemplateRenderer::new();
        let chat = SlackClient::new(&config.slack)?;

        let pipeline = ChangelogPipeline::new(&config, &source_control, &tracker, &renderer, &chat);
        let mut stdout = std::io::stdout().lock();
        let outcome = pipeline.execute(&options, &cwd, &mut stdout).await?;

        match outcome {
            PipelineOutcome::Completed {
                saved_to,
                delivered,
                ..
            } => {
                if let Some(path) = saved_to {
                    output::success(&format!("Saved changelog to {}", output::path(&path)));
                }
                if delivered {
                    output::success("Posted changelog to Slack");
                }
            }
            PipelineOutcome::Skipped { reason } => output::warning(&reason),
        }

        Ok(())
    }
}

/// Lexically resolve `.` and `..` components
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ticketlog_core::{RangeError, RangeSpec};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ticketlog").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse(&[
            "-c",
            "ci/ticketlog.yaml",
            "-r",
            "origin/prod...origin/main",
            "--slack",
            "--release",
            "1.4.0",
            "repo",
        ]);
        let options = cli.run_options(Path::new("/work")).unwrap();

        assert_eq!(options.config_path, Some(PathBuf::from("ci/ticketlog.yaml")));
        assert_eq!(
            options.range,
            Some(RangeSpec {
                symmetric: true,
                from: "origin/prod".to_string(),
                to: "origin/main".to_string(),
            })
        );
        assert!(options.date_range.is_none());
        assert!(options.slack);
        assert_eq!(options.release, ReleaseRequest::Explicit("1.4.0".to_string()));
        assert_eq!(options.path, Some(PathBuf::from("/work/repo")));
    }

    #[test]
    fn test_release_without_value_generates() {
        let cli = parse(&["--release"]);
        let options = cli.run_options(Path::new("/work")).unwrap();
        assert_eq!(options.release, ReleaseRequest::Generate);
        assert_eq!(options.path, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_release_absent() {
        let options = parse(&["-d", "2024-01-01...2024-02-01"])
            .run_options(Path::new("/work"))
            .unwrap();
        assert_eq!(options.release, ReleaseRequest::None);
        let dates = options.date_range.unwrap();
        assert_eq!(dates.from, "2024-01-01");
        assert_eq!(dates.to, "2024-02-01");
        assert!(!options.slack);
    }

    #[test]
    fn test_absolute_path_kept() {
        let options = parse(&["/srv/app"]).run_options(Path::new("/work")).unwrap();
        assert_eq!(options.path, Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn test_relative_path_normalized() {
        let options = parse(&["../repo"]).run_options(Path::new("/work/sub")).unwrap();
        assert_eq!(options.path, Some(PathBuf::from("/work/repo")));

        let options = parse(&["./a/../b/."]).run_options(Path::new("/work")).unwrap();
        assert_eq!(options.path, Some(PathBuf::from("/work/b")));
    }

    #[test]
    fn test_invalid_range_is_an_error() {
        let err = parse(&["-r", "..."]).run_options(Path::new("/work")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RangeError>(),
            Some(RangeError::InvalidRange(_))
        ));
    }
}
