//! Opt-in bounded retry around the retry-free core.
//!
//! The client itself never retries; callers wanting resilience wrap a call in
//! a [`RetryPolicy`]. Only transient classes are retried: rate limiting,
//! server faults, and network failures. Authentication and malformed-response
//! errors surface immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::Error;

/// Bounded exponential-backoff policy.
///
/// # Example
/// ```no_run
/// use chatstream::{ChatClient, ChatMessage, ClientConfig, RetryPolicy};
///
/// # async fn run() -> Result<(), chatstream::Error> {
/// let client = ChatClient::new(ClientConfig::new("sk-..."));
/// let policy = RetryPolicy::default();
/// let completion = policy
///     .run(|| client.complete(vec![ChatMessage::user("hello")]))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each retry.
    pub base_delay: Duration,
    /// Cap on the per-retry delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Whether an error class is worth retrying.
    pub fn is_retryable(err: &Error) -> bool {
        matches!(
            err,
            Error::RateLimit { .. } | Error::ServerFault { .. } | Error::Network(_)
        )
    }

    /// Run `op`, retrying retryable failures with exponential backoff until
    /// `max_attempts` is exhausted. The last error is returned as-is.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && Self::is_retryable(&err) => {
                    tracing::warn!(
                        code = err.code(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.max_delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
