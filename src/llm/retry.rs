// ============================================
// PLANGUARD - Retry with Exponential Backoff
// ============================================

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::providers::ApiError;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread delays by ±25%
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);

        let mut delay_ms = base_delay.min(self.max_delay.as_millis() as f64);

        if self.jitter {
            let jitter_range = delay_ms * 0.25;
            let jitter = (rand_simple() * 2.0 - 1.0) * jitter_range;
            delay_ms = (delay_ms + jitter).max(0.0);
        }

        Duration::from_millis(delay_ms as u64)
    }
}

/// Cheap 0.0..1.0 value from the clock; good enough for jitter
fn rand_simple() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Classify a failed call. Only [`ApiError`]s that are transient get
/// retried; anything else (bad responses, auth, malformed requests) is final.
pub fn is_retryable_error(error: &anyhow::Error) -> RetryDecision {
    let api_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>());

    match api_error {
        Some(e) if e.is_transient() => RetryDecision::Retry,
        _ => RetryDecision::NoRetry,
    }
}

/// Run `operation` until it succeeds, a permanent error occurs, or retries
/// run out.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: F) -> anyhow::Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= config.max_retries {
                    return Err(e);
                }
                if is_retryable_error(&e) == RetryDecision::NoRetry {
                    tracing::error!("Permanent error, not retrying: {:#}", e);
                    return Err(e);
                }

                let delay = config.delay_for_attempt(attempt);
                tracing::warn!(
                    "Attempt {} failed: {:#}. Retrying in {:?}...",
                    attempt + 1,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped() {
        let config = RetryConfig {
            initial_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(15),
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(15));
    }

    fn api_status(code: u16, body: &str) -> anyhow::Error {
        ApiError::Status {
            status: reqwest::StatusCode::from_u16(code).unwrap(),
            body: body.to_string(),
        }
        .into()
    }

    #[test]
    fn test_retryable_error_detection() {
        assert_eq!(is_retryable_error(&api_status(429, "")), RetryDecision::Retry);
        assert_eq!(is_retryable_error(&api_status(503, "")), RetryDecision::Retry);
        assert_eq!(is_retryable_error(&api_status(401, "")), RetryDecision::NoRetry);
    }

    #[test]
    fn test_body_text_does_not_make_error_retryable() {
        let err = api_status(422, "upstream timeout, got 500, try again");

        assert_eq!(is_retryable_error(&err), RetryDecision::NoRetry);
    }

    #[test]
    fn test_context_wrapped_api_error_still_classified() {
        let err = api_status(502, "").context("review call");

        assert_eq!(is_retryable_error(&err), RetryDecision::Retry);
    }

    #[test]
    fn test_untyped_errors_not_retried() {
        let err = anyhow::anyhow!("Chat completion response was not JSON: 503");

        assert_eq!(is_retryable_error(&err), RetryDecision::NoRetry);
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let result = with_retry(&fast(), || async { Ok::<_, anyhow::Error>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_transient_error_retried() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    return Err(api_status(503, "overloaded"));
                }
                Ok::<_, anyhow::Error>(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);

        let result: anyhow::Result<()> = with_retry(&fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(api_status(401, "invalid api key")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let calls = AtomicU32::new(0);

        let result: anyhow::Result<()> = with_retry(&fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(api_status(429, "rate limited")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
