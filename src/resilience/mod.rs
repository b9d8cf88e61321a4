//! Retry with exponential backoff for the chunked-upload path.
//!
//! Retries are confined to upload-session chunk requests; every other
//! failure is fatal to the current operation.

use crate::errors::GraphDriveError;
use std::future::Future;
use std::time::Duration;

/// Retry configuration for transient upstream failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Whether to add jitter to backoff.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retry_on: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: false,
            retry_on: vec![500, 502, 503, 504],
        }
    }
}

/// Calculates the backoff duration before retry number `retry` (1-based).
pub fn calculate_backoff(retry: u32, config: &RetryConfig) -> Duration {
    let base = config.initial_backoff.as_secs_f64();
    let exp = config.multiplier.powi(retry.saturating_sub(1) as i32);
    let mut delay = base * exp;

    let max = config.max_backoff.as_secs_f64();
    if delay > max {
        delay = max;
    }

    if config.jitter {
        use rand::Rng;
        delay += rand::thread_rng().gen_range(0.0..=delay * 0.1);
    }

    Duration::from_secs_f64(delay)
}

/// Executes an operation, retrying on a fixed status-code set.
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Creates a new retry executor.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The configuration this executor retries under.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation`, retrying while the error's HTTP status is in the
    /// configured set and attempts remain. Errors without a status (argument,
    /// connection, decode) are never retried.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, GraphDriveError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GraphDriveError>>,
    {
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    let transient = error
                        .status_code()
                        .is_some_and(|status| self.config.retry_on.contains(&status));

                    if !transient || retries >= self.config.max_retries {
                        return Err(error);
                    }

                    retries += 1;
                    let backoff = calculate_backoff(retries, &self.config);
                    tracing::warn!(
                        retry = retries,
                        delay_ms = backoff.as_millis() as u64,
                        status = error.status_code(),
                        "transient upstream failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn status_error(status: u16) -> GraphDriveError {
        TransportError::Status {
            status,
            body: String::new(),
        }
        .into()
    }

    fn fast_config() -> RetryConfig {
        RetryConfig {
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(10),
            ..RetryConfig::default()
        }
    }

    #[test]
    fn backoff_doubles_from_one_second() {
        let config = RetryConfig::default();
        assert_eq!(calculate_backoff(1, &config), Duration::from_secs(1));
        assert_eq!(calculate_backoff(2, &config), Duration::from_secs(2));
        assert_eq!(calculate_backoff(3, &config), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_clamped() {
        let config = RetryConfig {
            max_backoff: Duration::from_secs(10),
            ..RetryConfig::default()
        };
        assert_eq!(calculate_backoff(10, &config), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn retries_listed_statuses_until_success() {
        let attempts = AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_config());

        let result = executor
            .execute(|| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(status_error(503))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_config());

        let result: Result<(), _> = executor
            .execute(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(status_error(500)) }
            })
            .await;

        assert!(result.is_err());
        // initial attempt + 3 retries
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn non_listed_statuses_fail_immediately() {
        let attempts = AtomicU32::new(0);
        let executor = RetryExecutor::new(fast_config());

        let result: Result<(), _> = executor
            .execute(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(status_error(404)) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
