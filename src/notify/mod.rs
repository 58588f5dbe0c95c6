//! New-paper notifications
//!
//! After a flush the driver hands the list of new papers to a `Notifier`.
//! Delivery is best effort: `notify` formats a digest, tries to deliver it,
//! and logs a failure instead of returning it.

mod telegram;
mod webhook;

pub use telegram::TelegramNotifier;
pub use webhook::WebhookNotifier;

use crate::config::NotifierConfig;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Preview length when none is configured
pub const DEFAULT_PREVIEW: usize = 5;

/// Summary of one paper added during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub url: Option<String>,
}

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{channel} rejected the message: {detail}")]
    Rejected { channel: &'static str, detail: String },

    #[error("missing credential: {0}")]
    MissingCredential(String),
}

/// An external channel that receives the new-paper digest.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logs
    fn name(&self) -> &str;

    /// Number of items listed before the "+N more" line
    fn preview(&self) -> usize {
        DEFAULT_PREVIEW
    }

    /// Deliver an already formatted message
    async fn deliver(&self, text: &str) -> Result<(), NotifyError>;

    /// Format and deliver a digest for `items`. Never fails.
    async fn notify(&self, items: &[NewItem]) {
        if items.is_empty() {
            return;
        }
        let digest = format_digest(items, self.preview());
        match self.deliver(&digest).await {
            Ok(()) => tracing::info!(channel = self.name(), items = items.len(), "notification sent"),
            Err(e) => tracing::warn!(channel = self.name(), error = %e, "notification failed"),
        }
    }
}

/// Notifier that only logs
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    fn name(&self) -> &str {
        "noop"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        tracing::debug!(digest = text, "notifier disabled");
        Ok(())
    }
}

/// Build the configured notifier, reading its secret from the environment
pub fn from_config(config: &NotifierConfig, timeout: Duration) -> Result<Box<dyn Notifier>, NotifyError> {
    match config {
        NotifierConfig::Telegram {
            bot_token_env,
            chat_id,
            preview,
        } => {
            let token = read_env(bot_token_env)?;
            Ok(Box::new(
                TelegramNotifier::new(token, chat_id.as_str(), timeout)?.with_preview(*preview),
            ))
        }
        NotifierConfig::Webhook { url_env, preview } => {
            let url = read_env(url_env)?;
            Ok(Box::new(WebhookNotifier::new(url, timeout)?.with_preview(*preview)))
        }
    }
}

fn read_env(name: &str) -> Result<String, NotifyError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| NotifyError::MissingCredential(name.to_string()))
}

/// Human-readable digest: a count header, up to `preview` bullets with
/// their URL on the following line, then `+N more` for the rest.
pub fn format_digest(items: &[NewItem], preview: usize) -> String {
    let mut lines = vec![format!("{} new paper(s) added to the graph", items.len())];
    for item in items.iter().take(preview) {
        lines.push(format!("• {}", item.name));
        if let Some(ref url) = item.url {
            lines.push(url.clone());
        }
    }
    if items.len() > preview {
        lines.push(format!("+{} more", items.len() - preview));
    }
    lines.join("\n")
}
