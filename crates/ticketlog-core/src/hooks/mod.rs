//! Command hooks - user supplied shell commands
//!
//! Hooks let the configuration plug custom behaviour into a run:
//! - `jira.generate_release_version_name`: prints the next release name
//! - `transform_data`: rewrites template data (JSON in, JSON out)
//! - `transform_for_slack`: rewrites the chat message
//!
//! Each hook runs through the platform shell with its input on stdin and
//! the run context exported as `TICKETLOG_*` environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::{Config, DEFAULT_HOOK_TIMEOUT_SECS};
use crate::error::{HookError, Result};
use crate::range::ResolvedRange;

/// A shell command configured as a hook.
///
/// Deserializes from a plain string (`"./scripts/next.sh"`) or a table with
/// `command`, `cwd`, `env` and `timeout_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommandHookRepr")]
pub struct CommandHook {
    /// The command to run
    pub command: String,
    /// Working directory, relative to the repository
    pub cwd: Option<PathBuf>,
    /// Extra environment variables
    pub env: HashMap<String, String>,
    /// Timeout in seconds, overriding `hook_timeout_secs`
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandHookRepr {
    Command(String),
    Table {
        command: String,
        #[serde(default)]
        cwd: Option<PathBuf>,
        #[serde(default)]
        env: HashMap<String, String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl From<CommandHookRepr> for CommandHook {
    fn from(repr: CommandHookRepr) -> Self {
        match repr {
            CommandHookRepr::Command(command) => Self::new(command),
            CommandHookRepr::Table {
                command,
                cwd,
                env,
                timeout_secs,
            } => Self {
                command,
                cwd,
                env,
                timeout_secs,
            },
        }
    }
}

/// Hook execution context
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Directory relative hook paths are resolved against
    pub base_dir: Option<PathBuf>,
    /// Timeout for hooks without their own
    pub default_timeout_secs: u64,
    /// Resolved commit range
    pub range: Option<ResolvedRange>,
    /// Release name
    pub release: Option<String>,
}

impl Default for HookContext {
    fn default() -> Self {
        Self {
            base_dir: None,
            default_timeout_secs: DEFAULT_HOOK_TIMEOUT_SECS,
            range: None,
            release: None,
        }
    }
}

impl HookContext {
    /// Context seeded from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_dir: config.git_path.clone(),
            default_timeout_secs: config.hook_timeout_secs,
            ..Self::default()
        }
    }

    /// Set the resolved range
    pub fn with_range(mut self, range: &ResolvedRange) -> Self {
        self.range = Some(range.clone());
        self
    }

    /// Set the release name
    pub fn with_release(mut self, release: Option<&str>) -> Self {
        self.release = release.map(str::to_string);
        self
    }

    /// Convert context to environment variables
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        if let Some(range) = &self.range {
            if let Some(ref v) = range.from {
                env.insert("TICKETLOG_RANGE_FROM".to_string(), v.clone());
            }
            if let Some(ref v) = range.to {
                env.insert("TICKETLOG_RANGE_TO".to_string(), v.clone());
            }
            env.insert(
                "TICKETLOG_RANGE_SYMMETRIC".to_string(),
                range.symmetric.to_string(),
            );
            if let Some(ref v) = range.after {
                env.insert("TICKETLOG_RANGE_AFTER".to_string(), v.clone());
            }
            if let Some(ref v) = range.before {
                env.insert("TICKETLOG_RANGE_BEFORE".to_string(), v.clone());
            }
        }
        if let Some(ref v) = self.release {
            env.insert("TICKETLOG_RELEASE".to_string(), v.clone());
        }
        if let Some(ref dir) = self.base_dir {
            env.insert(
                "TICKETLOG_GIT_PATH".to_string(),
                dir.to_string_lossy().to_string(),
            );
        }

        env
    }
}

impl CommandHook {
    /// Create a hook from a command line
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: None,
            env: HashMap::new(),
            timeout_secs: None,
        }
    }

    fn working_dir(&self, base_dir: Option<&Path>) -> Option<PathBuf> {
        match (&self.cwd, base_dir) {
            (Some(cwd), Some(base)) if cwd.is_relative() => Some(base.join(cwd)),
            (Some(cwd), _) => Some(cwd.clone()),
            (None, base) => base.map(Path::to_path_buf),
        }
    }

    /// Run the hook, feeding `input` on stdin, and return its stdout.
    ///
    /// Fails when the command cannot be spawned, exits non-zero, or runs
    /// past its timeout.
    #[instrument(skip(self, input, context), fields(command = %self.command))]
    pub async fn run(&self, input: Option<&str>, context: &HookContext) -> Result<String> {
        let timeout_secs = self.timeout_secs.unwrap_or(context.default_timeout_secs);

        let shell = if cfg!(windows) { "cmd" } else { "sh" };
        let shell_arg = if cfg!(windows) { "/C" } else { "-c" };

        let mut cmd = Command::new(shell);
        cmd.arg(shell_arg).arg(&self.command);

        if let Some(dir) = self.working_dir(context.base_dir.as_deref()) {
            cmd.current_dir(dir);
        }

        for (k, v) in context.to_env() {
            cmd.env(k, v);
        }
        for (k, v) in &self.env {
            cmd.env(k, v);
        }

        cmd.stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!(timeout_secs, has_input = input.is_some(), "spawning hook");
        let mut child = cmd.spawn().map_err(|e| HookError::ExecutionFailed {
            command: self.command.clone(),
            message: e.to_string(),
        })?;

        let stdin = child.stdin.take();
        let write_input = async move {
            if let (Some(mut stdin), Some(input)) = (stdin, input) {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let execution = async {
            let (written, output) = tokio::join!(write_input, child.wait_with_output());
            if let Err(e) = written {
                // Hooks that ignore stdin close the pipe early
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    warn!(error = %e, "failed to write hook input");
                }
            }
            output
        };

        let output = tokio::time::timeout(Duration::from_secs(timeout_secs), execution)
            .await
            .map_err(|_| HookError::Timeout {
                command: self.command.clone(),
                seconds: timeout_secs,
            })?
            .map_err(|e| HookError::ExecutionFailed {
                command: self.command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(HookError::ExecutionFailed {
                command: self.command.clone(),
                message,
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(bytes = stdout.len(), "hook finished");
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TicketlogError;

    #[test]
    fn test_deserialize_from_string() {
        let hook: CommandHook = serde_yaml::from_str("\"./scripts/next.sh\"").unwrap();
        assert_eq!(hook, CommandHook::new("./scripts/next.sh"));
    }

    #[test]
    fn test_deserialize_from_table() {
        let hook: CommandHook =
            serde_yaml::from_str("command: jq .\ncwd: scripts\ntimeout_secs: 5\nenv:\n  A: b\n")
                .unwrap();
        assert_eq!(hook.command, "jq .");
        assert_eq!(hook.cwd, Some(PathBuf::from("scripts")));
        assert_eq!(hook.timeout_secs, Some(5));
        assert_eq!(hook.env.get("A").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_context_env() {
        let range = ResolvedRange {
            from: Some("v1".to_string()),
            to: Some("v2".to_string()),
            symmetric: true,
            after: None,
            before: None,
        };
        let env = HookContext::default()
            .with_range(&range)
            .with_release(Some("1.0"))
            .to_env();

        assert_eq!(env.get("TICKETLOG_RANGE_FROM").unwrap(), "v1");
        assert_eq!(env.get("TICKETLOG_RANGE_TO").unwrap(), "v2");
        assert_eq!(env.get("TICKETLOG_RANGE_SYMMETRIC").unwrap(), "true");
        assert!(!env.contains_key("TICKETLOG_RANGE_AFTER"));
        assert_eq!(env.get("TICKETLOG_RELEASE").unwrap(), "1.0");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reads_stdin() {
        let hook = CommandHook::new("tr a-z A-Z");
        let out = hook
            .run(Some("hello"), &HookContext::default())
            .await
            .unwrap();
        assert_eq!(out, "HELLO");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_exports_context() {
        let range = ResolvedRange {
            from: Some("v1".to_string()),
            ..Default::default()
        };
        let hook = CommandHook {
            env: HashMap::from([("GREETING".to_string(), "hi".to_string())]),
            ..CommandHook::new("printf '%s' \"$TICKETLOG_RANGE_FROM-$GREETING\"")
        };
        let out = hook
            .run(None, &HookContext::default().with_range(&range))
            .await
            .unwrap();
        assert_eq!(out, "v1-hi");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_in_base_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("name.txt"), "2.0.0").unwrap();

        let hook = CommandHook::new("cat name.txt");
        let out = hook
            .run(None, &HookContext {
                base_dir: Some(temp.path().to_path_buf()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(out, "2.0.0");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_non_zero_exit() {
        let hook = CommandHook::new("echo broken >&2; exit 3");
        let err = hook.run(None, &HookContext::default()).await.unwrap_err();
        match err {
            TicketlogError::Hook(HookError::ExecutionFailed { message, .. }) => {
                assert_eq!(message, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_timeout() {
        let hook = CommandHook {
            timeout_secs: Some(1),
            ..CommandHook::new("sleep 5")
        };
        let err = hook.run(None, &HookContext::default()).await.unwrap_err();
        assert!(matches!(
            err,
            TicketlogError::Hook(HookError::Timeout { seconds: 1, .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_ignores_unread_stdin() {
        let hook = CommandHook::new("echo 1.2.3");
        let out = hook
            .run(Some("{\"from\":\"v1\"}"), &HookContext::default())
            .await
            .unwrap();
        assert_eq!(out.trim(), "1.2.3");
    }
}
