//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `ticketlog.yaml`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/ticketlog.yaml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.exists() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration for a repository.
///
/// An explicit path must exist. Without one the repository directory and its
/// parents are searched, and defaults are used when nothing is found. The
/// returned config has `git_path` set to `repo_dir`.
pub fn load_config_for(explicit: Option<&Path>, repo_dir: &Path) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            load_config(path)?
        }
        None => match find_config(repo_dir) {
            Some(path) => load_config(&path)?,
            None => {
                warn!(dir = %repo_dir.display(), "no config found, using defaults");
                Config::default()
            }
        },
    };

    config.git_path = Some(repo_dir.to_path_buf());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TicketlogError;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("ticketlog.yaml");
        std::fs::write(&config_path, "save: true\n").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_yaml_over_toml() {
        let temp = TempDir::new().unwrap();
        let yaml_path = temp.path().join("ticketlog.yaml");
        let toml_path = temp.path().join("ticketlog.toml");
        std::fs::write(&yaml_path, "save: true\n").unwrap();
        std::fs::write(&toml_path, "save = true\n").unwrap();

        assert_eq!(find_config(temp.path()).unwrap(), yaml_path);
    }

    #[test]
    fn test_find_config_in_github_dir() {
        let temp = TempDir::new().unwrap();
        let github_dir = temp.path().join(".github");
        std::fs::create_dir_all(&github_dir).unwrap();
        let config_path = github_dir.join(".ticketlog.toml");
        std::fs::write(&config_path, "save = true\n").unwrap();

        assert_eq!(find_config(temp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("ticketlog.yaml");
        std::fs::write(&config_path, "save: true\n").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("ticketlog.yaml");
        std::fs::write(
            &config_path,
            r##"
save: true
source_control:
  default_range:
    from: origin/prod
    to: origin/main
    symmetric: true
jira:
  api:
    host: example.atlassian.net
  generate_release_version_name: "echo 1.2.3"
slack:
  channel: "#releases"
transform_for_slack:
  command: "cat"
  timeout_secs: 5
"##,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert!(config.save);
        let range = config.source_control.default_range.unwrap();
        assert_eq!(range.from.as_deref(), Some("origin/prod"));
        assert_eq!(range.key_count(), 3);
        assert_eq!(
            config.jira.generate_release_version_name.unwrap().command,
            "echo 1.2.3"
        );
        let transform = config.transform_for_slack.unwrap();
        assert_eq!(transform.command, "cat");
        assert_eq!(transform.timeout_secs, Some(5));
        assert_eq!(config.slack.channel.as_deref(), Some("#releases"));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("ticketlog.toml");
        std::fs::write(
            &config_path,
            "save = true\ntemplate = \"CHANGES.tpl\"\n\n[jira]\nexclude_issue_types = [\"Epic\"]\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert!(config.save);
        assert_eq!(config.template, Some(PathBuf::from("CHANGES.tpl")));
        assert_eq!(config.jira.exclude_issue_types, vec!["Epic".to_string()]);
    }

    #[test]
    fn test_load_config_for_missing_explicit_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");

        let err = load_config_for(Some(&missing), temp.path()).unwrap_err();
        assert!(matches!(
            err,
            TicketlogError::Config(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_config_for_rejects_invalid_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("ticketlog.yaml"),
            "jira:\n  ticket_id_pattern: \"[A-Z+\"\n",
        )
        .unwrap();

        let err = load_config_for(None, temp.path()).unwrap_err();
        assert!(matches!(
            err,
            TicketlogError::Config(ConfigError::InvalidValue { ref field, .. })
                if field == "jira.ticket_id_pattern"
        ));
    }

    #[test]
    fn test_load_config_for_defaults_sets_git_path() {
        let temp = TempDir::new().unwrap();

        let config = load_config_for(None, temp.path()).unwrap();
        assert!(!config.save);
        assert_eq!(config.git_path.as_deref(), Some(temp.path()));
    }
}
