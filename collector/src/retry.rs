use std::{future::Future, time::Duration};

use tracing::warn;

use crate::CollectError;

/// Exponential backoff for transient failures: with the defaults a request is
/// retried three times, waiting 1s, 2s and 4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// `retry` is 1-based.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }

    pub async fn run<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T, CollectError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CollectError>>,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay_for_retry(retry);
                    warn!(
                        "{what} failed: {e}. Retry {retry}/{} in {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    return Err(CollectError::Exhausted {
                        attempts: retry + 1,
                        last: e.to_string(),
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }
}
