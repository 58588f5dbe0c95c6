//! Generic JSON webhook notifier

use super::{Notifier, NotifyError, DEFAULT_PREVIEW};
use crate::source::http::build_client;
use async_trait::async_trait;
use std::time::Duration;

/// POSTs `{"text": digest}` to a URL (Slack, Mattermost, Discord-compatible
/// endpoints accept this shape)
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    preview: usize,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
            preview: DEFAULT_PREVIEW,
        })
    }

    pub fn with_preview(mut self, preview: usize) -> Self {
        self.preview = preview;
        self
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn preview(&self) -> usize {
        self.preview
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                channel: "webhook",
                detail: format!("status {}: {}", status, detail.trim()),
            });
        }
        Ok(())
    }
}
