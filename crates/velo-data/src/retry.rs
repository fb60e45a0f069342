//! Bounded exponential-backoff retry for fallible async operations.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::cancel::CancelToken;

/// Retry policy: attempt budget and backoff shape.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap on the backoff delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1)
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Backoff before retrying after the given failed attempt (1-indexed):
    /// `min(initial * 2^(attempt-1), max)`, without jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
        let delay = self.initial_delay.saturating_mul(multiplier);
        delay.min(self.max_delay)
    }

    /// Add up to 10% random jitter so synchronized clients fan out.
    fn jittered(&self, delay: Duration) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.0..=0.1);
        delay + delay.mul_f64(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// How a retried operation ultimately failed.
#[derive(Error, Debug)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// The cancel token fired before an attempt or during a backoff sleep.
    #[error("operation cancelled")]
    Cancelled,

    /// Every attempt in the budget failed with a retryable error; carries
    /// the last one unchanged.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    /// A non-retryable error ended the operation; carried unchanged.
    #[error(transparent)]
    Fatal(E),
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// The underlying operation error, if the failure was not cancellation.
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Cancelled => None,
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Fatal(e) => Some(e),
        }
    }
}

/// Run `op` under the policy.
///
/// Returns the first success immediately. Failures classified as
/// non-retryable by `classify` propagate at once; retryable failures back
/// off exponentially (plus jitter) until the attempt budget is spent. The
/// cancel token is honored both before each attempt and during the backoff
/// sleep.
pub async fn retry<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut classify: C,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: FnMut(&E) -> bool,
{
    let mut attempt = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !classify(&e) => return Err(RetryError::Fatal(e)),
            Err(e) if attempt >= policy.max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: e,
                })
            }
            Err(e) => {
                let delay = policy.jittered(policy.delay_for_attempt(attempt));
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient failure, retrying"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test error (retryable={})", self.retryable)
        }
    }

    impl std::error::Error for TestError {}

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts)
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(4))
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::new(6)
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_success_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result = retry(
            &fast_policy(3),
            &CancelToken::new(),
            |_: &TestError| true,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, TestError>(7) }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retryable_failure_uses_full_budget() {
        let calls = AtomicU32::new(0);
        let result = retry(
            &fast_policy(4),
            &CancelToken::new(),
            |e: &TestError| e.retryable,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<u32, _>(TestError { retryable: true }) }
            },
        )
        .await;
        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 4, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_fatal_failure_attempted_once() {
        let calls = AtomicU32::new(0);
        let result = retry(
            &fast_policy(4),
            &CancelToken::new(),
            |e: &TestError| e.retryable,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<u32, _>(TestError { retryable: false }) }
            },
        )
        .await;
        assert!(matches!(result, Err(RetryError::Fatal(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_eventual_success() {
        let calls = AtomicU32::new(0);
        let result = retry(
            &fast_policy(5),
            &CancelToken::new(),
            |e: &TestError| e.retryable,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(TestError { retryable: true })
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_pre_cancelled_never_attempts() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let calls = AtomicU32::new(0);
        let result = retry(
            &fast_policy(3),
            &cancel,
            |_: &TestError| true,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, TestError>(1) }
            },
        )
        .await;
        assert!(matches!(result, Err(RetryError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_backoff() {
        let policy = RetryPolicy::new(3)
            .with_initial_delay(Duration::from_secs(30))
            .with_max_delay(Duration::from_secs(30));
        let cancel = CancelToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result = retry(&policy, &cancel, |_: &TestError| true, || async {
            Err::<u32, _>(TestError { retryable: true })
        })
        .await;
        assert!(matches!(result, Err(RetryError::Cancelled)));
        // The 30s backoff sleep must have been interrupted.
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
