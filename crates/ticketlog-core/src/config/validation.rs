//! Configuration validation

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::hooks::CommandHook;

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_jira(config)?;
    validate_slack(config)?;
    validate_hooks(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_jira(config: &Config) -> Result<()> {
    if let Err(e) = Regex::new(&config.jira.ticket_id_pattern) {
        return Err(ConfigError::InvalidValue {
            field: "jira.ticket_id_pattern".to_string(),
            message: e.to_string(),
        }
        .into());
    }

    if let Some(host) = &config.jira.api.host {
        if host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "jira.api.host".to_string(),
                message: "host cannot be blank".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_slack(config: &Config) -> Result<()> {
    if let Some(channel) = &config.slack.channel {
        if channel.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "slack.channel".to_string(),
                message: "channel cannot be blank".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_hooks(config: &Config) -> Result<()> {
    let hooks: [(&str, &Option<CommandHook>); 3] = [
        (
            "jira.generate_release_version_name",
            &config.jira.generate_release_version_name,
        ),
        ("transform_for_slack", &config.transform_for_slack),
        ("transform_data", &config.transform_data),
    ];

    for (field, hook) in hooks {
        if let Some(hook) = hook {
            if hook.command.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "command cannot be empty".to_string(),
                }
                .into());
            }
            if hook.timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.timeout_secs", field),
                    message: "timeout must be greater than zero".to_string(),
                }
                .into());
            }
        }
    }

    if config.hook_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "hook_timeout_secs".to_string(),
            message: "timeout must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(())
}
