//! Retry policy for transient failures.
//!
//! A call is attempted up to `retry_count + 1` times. Transport errors and
//! responses with status 500 or above are transient and retried; any response
//! below 500 ends the loop. Between attempts the client waits linearly longer:
//! one backoff unit after the first attempt, two after the second, and so on.
//!
//! Waiting goes through the [`Sleeper`] trait so the delay source can be swapped
//! out, for example to record delays in tests instead of sleeping.

use async_trait::async_trait;
use http::StatusCode;
use std::time::Duration;

/// Linear backoff with a fixed number of retries.
///
/// # Examples
///
/// ```
/// use gamehub_client::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
///
/// assert_eq!(policy.max_attempts(), 4);
/// assert_eq!(policy.delay_after(0), Some(Duration::from_secs(1)));
/// assert_eq!(policy.delay_after(2), Some(Duration::from_secs(3)));
/// assert_eq!(policy.delay_after(3), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_count: usize,
    backoff_unit: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `retry_count` retries, stepping by `backoff_unit`.
    pub fn new(retry_count: usize, backoff_unit: Duration) -> Self {
        Self {
            retry_count,
            backoff_unit,
        }
    }

    /// Total number of attempts, the first one included.
    pub fn max_attempts(&self) -> usize {
        self.retry_count.saturating_add(1)
    }

    /// Returns the wait after the attempt at `attempt_index` (0-based), or `None`
    /// if that was the last attempt.
    pub fn delay_after(&self, attempt_index: usize) -> Option<Duration> {
        if attempt_index >= self.retry_count {
            return None;
        }

        let steps = u32::try_from(attempt_index + 1).unwrap_or(u32::MAX);
        Some(self.backoff_unit.saturating_mul(steps))
    }

    /// Returns `true` if a response with this status should be retried.
    pub fn is_transient_status(status: StatusCode) -> bool {
        status.as_u16() >= 500
    }
}

/// Source of backoff delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_delays() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        assert_eq!(policy.delay_after(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_after(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_secs(3)));
        assert_eq!(policy.delay_after(3), None);
    }

    #[test]
    fn test_custom_unit() {
        let policy = RetryPolicy::new(2, Duration::from_millis(250));

        assert_eq!(policy.delay_after(0), Some(Duration::from_millis(250)));
        assert_eq!(policy.delay_after(1), Some(Duration::from_millis(500)));
        assert_eq!(policy.delay_after(2), None);
    }

    #[test]
    fn test_no_retry() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delay_after(0), None);
    }

    #[test]
    fn test_transient_status() {
        for code in [500, 502, 503, 504, 599] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(RetryPolicy::is_transient_status(status), "{code}");
        }
        for code in [200, 201, 400, 401, 404, 429, 499] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(!RetryPolicy::is_transient_status(status), "{code}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(2)).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
