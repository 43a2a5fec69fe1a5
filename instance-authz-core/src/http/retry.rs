use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use super::error::HttpError;

/// Backoff policy for calls to the storage API and the decision point.
///
/// Configured per upstream under `retry`, e.g. `pdp.retry.max_attempts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: usize,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            initial_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    fn next_delay(&self, delay_ms: u64) -> u64 {
        delay_ms.saturating_mul(2).min(self.max_delay_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error("Gave up after {attempts} attempts: {error}")]
    ExhaustedRetries { error: HttpError, attempts: usize },
    #[error("{0}")]
    NonRetriable(HttpError),
}

impl RetryError {
    pub fn http_error(&self) -> &HttpError {
        match self {
            Self::ExhaustedRetries { error, .. } => error,
            Self::NonRetriable(error) => error,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.http_error().status_code()
    }

    pub fn is_not_found(&self) -> bool {
        self.http_error().is_not_found()
    }

    /// The upstream answered, but the body did not deserialize
    pub fn is_parse_error(&self) -> bool {
        matches!(self.http_error(), HttpError::ParseError(_))
    }
}

/// Server errors, throttling, timeouts and connection failures get another attempt
pub fn is_retriable_error(err: &HttpError) -> bool {
    match err {
        HttpError::Http { status, .. } => *status == 429 || (500..600).contains(status),
        HttpError::Network(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.is_request()
                || e.status().is_some_and(|s| s.is_server_error())
        }
        HttpError::Timeout => true,
        HttpError::ParseError(_) => false,
    }
}

/// Run `f` until it succeeds, fails with a non-retriable error, or the attempts are used up
pub async fn with_retry<F, Fut, T>(f: F, config: &RetryConfig) -> Result<T, RetryError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, HttpError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.initial_delay_ms;
    let mut attempt = 0;

    loop {
        attempt += 1;
        let err = match f().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable_error(&err) {
            return Err(RetryError::NonRetriable(err));
        }
        if attempt >= max_attempts {
            return Err(RetryError::ExhaustedRetries {
                error: err,
                attempts: max_attempts,
            });
        }

        warn!(
            "Upstream call failed (attempt {}/{}), retrying in {}ms: {}",
            attempt, max_attempts, delay, err
        );
        sleep(Duration::from_millis(delay)).await;
        delay = config.next_delay(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config(max_attempts: usize) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay_ms: 1,
            max_delay_ms: 2,
        }
    }

    #[tokio::test]
    async fn test_decision_point_outage_is_retried_until_success() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(HttpError::http(503, "unavailable"))
                } else {
                    Ok(42)
                }
            },
            &fast_config(3),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_throttling_is_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HttpError::http(429, "slow down"))
            },
            &fast_config(2),
        )
        .await;

        assert!(matches!(
            result,
            Err(RetryError::ExhaustedRetries { attempts: 2, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_application_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HttpError::http(404, "application not found"))
            },
            &fast_config(3),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RetryError::NonRetriable(_)));
        assert!(err.is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parse_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HttpError::ParseError("expected value".to_string()))
            },
            &fast_config(3),
        )
        .await;

        assert!(result.unwrap_err().is_parse_error());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_single_attempt_policy_never_sleeps() {
        let config = RetryConfig::single_attempt();
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.next_delay(config.initial_delay_ms), 0);
    }

    #[test]
    fn test_delay_doubles_up_to_ceiling() {
        let config = RetryConfig::default();
        assert_eq!(config.next_delay(200), 400);
        assert_eq!(config.next_delay(1500), 2000);
        assert_eq!(config.next_delay(u64::MAX), 2000);
    }
}
