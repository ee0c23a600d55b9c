//! Changelog renderer collaborator

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use ticketlog_core::error::{Result, TemplateError};
use ticketlog_core::{ChangelogData, ChangelogRenderer, Config, ReleaseVersion, TemplateData};

use crate::decode::decode_entities;
use crate::markdown::render_markdown;
use crate::template::render_template;
use crate::template_data::{build_template_data, transform_template_data};

/// Renders with the configured template, or the built-in markdown layout
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self
    }

    /// Template path, relative paths resolved against the repository
    fn template_path(config: &Config) -> Option<PathBuf> {
        let template = config.template.as_ref()?;
        if template.is_absolute() {
            Some(template.clone())
        } else {
            Some(config.working_dir().join(template))
        }
    }
}

#[async_trait]
impl ChangelogRenderer for TemplateRenderer {
    async fn template_data(
        &self,
        config: &Config,
        changelog: &ChangelogData,
        release_versions: &[ReleaseVersion],
    ) -> Result<TemplateData> {
        let data = build_template_data(config, changelog, release_versions);
        transform_template_data(config, data).await
    }

    #[instrument(skip_all, fields(template = ?config.template))]
    async fn render(&self, config: &Config, data: &TemplateData) -> Result<String> {
        let Some(path) = Self::template_path(config) else {
            return Ok(render_markdown(data));
        };

        let template = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound(path.clone())
            } else {
                TemplateError::Io(e)
            }
        })?;
        debug!(path = %path.display(), "rendering with template");

        Ok(render_template(&template, data))
    }

    fn decode_entities(&self, text: &str) -> String {
        decode_entities(text)
    }
}
