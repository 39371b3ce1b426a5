//! Retry policy and the generic retry loop
//!
//! A [`RetryPolicy`] bounds how many transient failures an operation may
//! absorb and how long to wait between attempts. [`with_retry`] drives any
//! async operation under a policy; it knows nothing about HTTP.

use crate::error::FetchError;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Classifies errors as transient
pub trait Retryable {
    /// Whether another attempt may succeed
    fn is_retryable(&self) -> bool;
}

impl Retryable for FetchError {
    fn is_retryable(&self) -> bool {
        FetchError::is_retryable(self)
    }
}

/// Delay between attempts as a function of failures so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately
    None,
    /// Same delay every time
    Fixed(Duration),
    /// `failures * step`
    Linear(Duration),
}

impl Backoff {
    /// Delay after the `failures`-th transient failure (1-based)
    #[inline]
    #[must_use]
    pub fn delay(&self, failures: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
            Backoff::Linear(step) => step.saturating_mul(failures),
        }
    }
}

/// Retry policy `{max_attempts, backoff}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Transient failures tolerated before giving up
    pub max_attempts: u32,
    /// Delay schedule
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Linear backoff: `attempt * step`
    #[inline]
    #[must_use]
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self::new(max_attempts, Backoff::Linear(step))
    }

    /// Single attempt, never retried
    #[inline]
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1, Backoff::None)
    }

    /// Delay after the `failures`-th transient failure
    #[inline]
    #[must_use]
    pub fn delay_for(&self, failures: u32) -> Duration {
        self.backoff.delay(failures)
    }
}

impl Default for RetryPolicy {
    /// Three attempts, one extra second per failure
    fn default() -> Self {
        Self::linear(3, Duration::from_secs(1))
    }
}

/// Operation gave up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryFailure<E> {
    /// Last error seen
    pub error: E,
    /// Attempts made in this call
    pub attempts: u32,
    /// Transient failures counted, including those consumed before the call
    pub failures: u32,
}

impl<E: fmt::Display> fmt::Display for RetryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (after {} attempt(s), {} transient failure(s))",
            self.error, self.attempts, self.failures
        )
    }
}

/// Run `operation` until it succeeds, fails permanently or exhausts the policy
///
/// `consumed` counts transient failures already charged against the policy
/// (a caller resuming a retry sequence). It is clamped below
/// `policy.max_attempts`, so at least one attempt is always made and the
/// reported failure count never exceeds the policy. The operation receives the 1-based attempt number of this call.
///
/// # Errors
/// Returns the last error with counters when a non-retryable error occurs
/// or the failure count reaches `policy.max_attempts`.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    consumed: u32,
    mut operation: F,
) -> Result<T, RetryFailure<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let mut failures = consumed.min(policy.max_attempts.saturating_sub(1));
    let mut attempts = 0;

    loop {
        attempts += 1;
        match operation(attempts).await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_retryable() => {
                tracing::debug!("attempt {} failed permanently: {}", attempts, error);
                return Err(RetryFailure {
                    error,
                    attempts,
                    failures,
                });
            }
            Err(error) => {
                failures += 1;
                if failures >= policy.max_attempts {
                    tracing::warn!(
                        "giving up after {} transient failure(s): {}",
                        failures,
                        error
                    );
                    return Err(RetryFailure {
                        error,
                        attempts,
                        failures,
                    });
                }
                let delay = policy.delay_for(failures);
                tracing::debug!(
                    "attempt {} failed ({}), retrying in {}ms",
                    attempts,
                    error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
