//! Shared HTTP plumbing for providers and notifiers

use super::record::SourceKind;
use super::traits::ProviderError;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const USER_AGENT: &str = concat!("papernet/", env!("CARGO_PKG_VERSION"));

/// Build a client with the configured request timeout
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(USER_AGENT)
        .build()
}

/// Enforces a minimum spacing between requests to one provider
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed, then claim the slot
    pub async fn wait(&self) {
        let wait = {
            let last = self.last_request.lock().unwrap_or_else(|p| p.into_inner());
            last.and_then(|instant| self.min_interval.checked_sub(instant.elapsed()))
        }; // guard dropped before the await

        if let Some(wait) = wait {
            tokio::time::sleep(wait).await;
        }

        *self.last_request.lock().unwrap_or_else(|p| p.into_inner()) = Some(Instant::now());
    }
}

/// Map a non-success status to a provider error
pub fn check_status(
    provider: SourceKind,
    response: reqwest::Response,
    id: Option<&str>,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status.as_u16(), id) {
        (404, Some(id)) => Err(ProviderError::NotFound(id.to_string())),
        (429, _) => Err(ProviderError::RateLimited(provider)),
        (code, _) => Err(ProviderError::Status {
            provider,
            status: code,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_request_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let started = Instant::now();
        limiter.wait().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn second_request_waits_for_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        limiter.wait().await;
        let started = tokio::time::Instant::now();
        limiter.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
