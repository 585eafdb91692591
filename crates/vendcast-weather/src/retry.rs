//! Backoff for weather requests.
//!
//! Timeouts, refused connections, 5xx, 408 and 429 are tried again. Any other
//! response comes back from the first try.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

/// How many times to re-send a weather request and how long to wait between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    retries: u32,
    base_delay: Duration,
    delay_cap: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3, 100, 5_000)
    }
}

impl RetryConfig {
    pub fn new(retries: u32, base_delay_ms: u64, delay_cap_ms: u64) -> Self {
        Self {
            retries,
            base_delay: Duration::from_millis(base_delay_ms),
            delay_cap: Duration::from_millis(delay_cap_ms),
        }
    }

    /// Single attempt
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Pause before retry `n` (0-based): the base delay doubled `n` times, capped.
    pub fn backoff(&self, n: u32) -> Duration {
        let factor = 1u32.checked_shl(n).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.delay_cap)
            .min(self.delay_cap)
    }
}

fn worth_retrying_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

fn worth_retrying_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.status().is_some_and(worth_retrying_status)
}

/// Send with `send` until the outcome is final or the retries are used up.
///
/// The last attempt is returned whatever it is, so a 503 after the final retry
/// still reaches the caller as a response.
pub async fn with_retry<F, Fut>(config: &RetryConfig, mut send: F) -> Result<Response, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let tries = config.retries + 1;
    for n in 0..config.retries {
        match send().await {
            Ok(response) if !worth_retrying_status(response.status()) => return Ok(response),
            Err(e) if !worth_retrying_error(&e) => return Err(e),
            Ok(response) => {
                tracing::warn!("Weather API answered {} (try {}/{})", response.status(), n + 1, tries)
            }
            Err(e) => tracing::warn!("Weather request failed (try {}/{}): {}", n + 1, tries, e),
        }

        let pause = config.backoff(n);
        tracing::debug!("Next weather request in {:?}", pause);
        tokio::time::sleep(pause).await;
    }

    send().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.retries(), 3);
        assert_eq!(config.backoff(0), Duration::from_millis(100));
        assert_eq!(config.backoff(10), Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let config = RetryConfig::new(10, 100, 1000);

        let pauses: Vec<u128> = (0..5).map(|n| config.backoff(n).as_millis()).collect();
        assert_eq!(pauses, vec![100, 200, 400, 800, 1000]);
        assert_eq!(config.backoff(40), Duration::from_millis(1000));
    }

    #[test]
    fn test_none_never_waits() {
        let config = RetryConfig::none();
        assert_eq!(config.retries(), 0);
        assert_eq!(config.backoff(0), Duration::ZERO);
    }

    #[test]
    fn test_which_statuses_are_retried() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::REQUEST_TIMEOUT,
        ] {
            assert!(worth_retrying_status(status), "{status} should be retried");
        }
        for status in [StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND] {
            assert!(!worth_retrying_status(status), "{status} should not be retried");
        }
    }
}
