//! Chat delivery

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::hooks::HookContext;
use crate::traits::ChatClient;
use crate::types::TemplateData;

/// Post the changelog to the configured chat channel.
///
/// Fails with [`ChatError::NotConfigured`] before doing anything else when
/// the client is disabled or no channel is set. The `transform_for_slack`
/// hook receives `{"message", "data"}` on stdin and its stdout replaces the
/// message.
#[instrument(skip_all)]
pub async fn deliver(
    config: &Config,
    chat: &dyn ChatClient,
    template_data: &TemplateData,
    message: &str,
) -> Result<()> {
    if !chat.is_enabled() {
        return Err(ChatError::NotConfigured("no chat API token available".to_string()).into());
    }
    let channel = config
        .slack
        .channel
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ChatError::NotConfigured("slack.channel is not set".to_string()))?;

    let message = match &config.transform_for_slack {
        Some(hook) => {
            debug!(command = %hook.command, "transforming chat message");
            let input = json!({ "message": message, "data": template_data }).to_string();
            let context = HookContext::from_config(config).with_release(template_data.release.as_deref());
            hook.run(Some(&input), &context).await?
        }
        None => message.to_string(),
    };

    chat.post_message(&message, channel)
        .await
        .map_err(|e| ChatError::DeliveryFailed {
            channel: channel.to_string(),
            reason: e.to_string(),
        })?;

    info!(channel, bytes = message.len(), "delivered changelog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TicketlogError;
    use crate::hooks::CommandHook;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingChat {
        enabled: bool,
        fail: bool,
        posts: Mutex<Vec<(String, String)>>,
    }

    impl RecordingChat {
        fn new(enabled: bool) -> Self {
            Self {
                enabled,
                fail: false,
                posts: Mutex::new(Vec::new()),
            }
        }

        fn posts(&self) -> Vec<(String, String)> {
            self.posts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatClient for RecordingChat {
        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn post_message(&self, text: &str, channel: &str) -> Result<()> {
            if self.fail {
                return Err(ChatError::ApiError("channel_not_found".to_string()).into());
            }
            self.posts
                .lock()
                .unwrap()
                .push((text.to_string(), channel.to_string()));
            Ok(())
        }
    }

    fn template_data() -> TemplateData {
        TemplateData {
            release: Some("1.0".to_string()),
            date: "2024-01-01".to_string(),
            jira_base_url: None,
            ticket_groups: Vec::new(),
            pending_tickets: Vec::new(),
            commits_without_tickets: Vec::new(),
            release_versions: Vec::new(),
            ticket_count: 0,
            commit_count: 0,
        }
    }

    fn config_with_channel() -> Config {
        let mut config = Config::default();
        config.slack.channel = Some("#releases".to_string());
        config
    }

    #[tokio::test]
    async fn test_posts_message() {
        let chat = RecordingChat::new(true);

        deliver(&config_with_channel(), &chat, &template_data(), "hello")
            .await
            .unwrap();
        assert_eq!(
            chat.posts(),
            vec![("hello".to_string(), "#releases".to_string())]
        );
    }

    #[tokio::test]
    async fn test_disabled_client_skips_hook_and_post() {
        let temp = tempfile::TempDir::new().unwrap();
        let marker = temp.path().join("ran");
        let mut config = config_with_channel();
        config.transform_for_slack = Some(CommandHook::new(format!(
            "touch '{}'",
            marker.display()
        )));
        let chat = RecordingChat::new(false);

        let err = deliver(&config, &chat, &template_data(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TicketlogError::Chat(ChatError::NotConfigured(_))
        ));
        assert!(chat.posts().is_empty());
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_missing_channel_skips_hook_and_post() {
        let temp = tempfile::TempDir::new().unwrap();
        let marker = temp.path().join("ran");
        let mut config = Config::default();
        config.transform_for_slack = Some(CommandHook::new(format!(
            "touch '{}'",
            marker.display()
        )));
        let chat = RecordingChat::new(true);

        let err = deliver(&config, &chat, &template_data(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TicketlogError::Chat(ChatError::NotConfigured(_))
        ));
        assert!(chat.posts().is_empty());
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_post_failure_is_wrapped() {
        let mut chat = RecordingChat::new(true);
        chat.fail = true;

        let err = deliver(&config_with_channel(), &chat, &template_data(), "hello")
            .await
            .unwrap_err();
        match err {
            TicketlogError::Chat(ChatError::DeliveryFailed { channel, reason }) => {
                assert_eq!(channel, "#releases");
                assert!(reason.contains("channel_not_found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_transform_hook_rewrites_message() {
        let mut config = config_with_channel();
        config.transform_for_slack = Some(CommandHook::new(
            "grep -o '\"release\":\"[^\"]*\"' | head -n 1",
        ));
        let chat = RecordingChat::new(true);

        deliver(&config, &chat, &template_data(), "hello")
            .await
            .unwrap();
        let posts = chat.posts();
        assert_eq!(posts[0].0.trim(), "\"release\":\"1.0\"");
    }
}
