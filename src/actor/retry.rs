//! Retry utilities with exponential backoff.

use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with specified parameters
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
        }
    }
}

/// Execute an async operation with exponential backoff retry.
///
/// Errors for which `should_retry` returns false are returned immediately.
/// Other errors are retried up to `config.max_retries` times, with exponentially
/// increasing delays between attempts (capped at `config.max_delay`).
///
/// Returns the result of the first successful attempt, or the last error if all
/// retries are exhausted.
///
/// # Example
/// ```ignore
/// let result = with_retry(&config, |e| e.is_transient(), || async {
///     some_fallible_operation().await
/// }).await;
/// ```
pub async fn with_retry<F, Fut, T, E, R>(
    config: &RetryConfig,
    should_retry: R,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    R: Fn(&E) -> bool,
{
    let mut attempts = 0;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !should_retry(&e) {
                    return Err(e);
                }

                attempts += 1;
                if attempts > config.max_retries {
                    return Err(e);
                }

                tracing::debug!(
                    "Attempt {}/{} not done: {}. Retrying in {:?}...",
                    attempts,
                    config.max_retries + 1,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;

                // Exponential backoff with cap
                delay = (delay * 2).min(config.max_delay);
            }
        }
    }
}
