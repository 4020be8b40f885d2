use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Runs `operation` until it succeeds or the retry budget is spent.
///
/// The operation is attempted once, then retried up to `max_retries` more
/// times with a constant `delay` between attempts. Success returns at once,
/// without waiting. When every attempt fails the last error is returned.
///
/// Each retry reissues the operation, so non-idempotent operations must
/// tolerate being invoked more than once.
///
/// # Example
///
/// ```rust,ignore
/// use paged_etl::retry::retry_on_failure;
/// use std::time::Duration;
///
/// let value = retry_on_failure(|| sink.write(&batch), 5, Duration::from_millis(100)).await?;
/// ```
pub async fn retry_on_failure<F, Fut, T, E>(
    mut operation: F,
    max_retries: usize,
    delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut remaining = max_retries;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if remaining > 0 => {
                remaining -= 1;
                warn!(
                    attempt = max_retries - remaining,
                    remaining,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
