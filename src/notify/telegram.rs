//! Telegram Bot API notifier

use super::{Notifier, NotifyError, DEFAULT_PREVIEW};
use crate::source::http::build_client;
use async_trait::async_trait;
use std::time::Duration;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends the digest to one chat through `sendMessage`
pub struct TelegramNotifier {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
    preview: usize,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: TELEGRAM_API_BASE.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            preview: DEFAULT_PREVIEW,
        })
    }

    pub fn with_preview(mut self, preview: usize) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn preview(&self) -> usize {
        self.preview
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.send_url())
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
                "disable_web_page_preview": true,
            }))
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if !status.is_success() || !body["ok"].as_bool().unwrap_or(false) {
            let detail = body["description"].as_str().unwrap_or("unknown error");
            return Err(NotifyError::Rejected {
                channel: "telegram",
                detail: format!("{} ({})", detail, status),
            });
        }
        Ok(())
    }
}
