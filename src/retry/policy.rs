use derive_builder::Builder;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use super::executor::retry_on_failure;

/// Bounded retry with a constant delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct RetryPolicy {
    /// Number of attempts after the first one
    #[builder(default = "5")]
    pub(crate) max_retries: usize,

    /// Pause between two attempts
    #[builder(default = "Duration::from_millis(100)")]
    pub(crate) delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, delay: Duration) -> Self {
        RetryPolicy { max_retries, delay }
    }

    /// A single attempt, never retried.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    #[inline]
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        retry_on_failure(operation, self.max_retries, self.delay).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(5, Duration::from_millis(100))
    }
}
