//! Exponential-backoff retry for transiently failing operations.

use std::future::Future;
use std::time::Duration;

/// Retry an operation with pure exponential backoff.
///
/// The operation runs at most `max_retries + 1` times. The delay before
/// retry `k` (0-indexed) is `base_delay * 2^k`; there is no jitter, and
/// no delay is scheduled after the final failure. Every non-final
/// failure is logged with the attempt number and the computed delay.
///
/// On exhaustion the last-seen error is returned unwrapped.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use claimiq_handler::retry_with_backoff;
///
/// let result = retry_with_backoff(
///     || fetch_claim_record(&claim_id),
///     3,
///     Duration::from_millis(200),
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_retries {
                    tracing::error!(
                        attempts = attempt + 1,
                        error = %err,
                        "operation failed, retries exhausted"
                    );
                    return Err(err);
                }

                let delay = base_delay * 2u32.pow(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying after backoff"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
