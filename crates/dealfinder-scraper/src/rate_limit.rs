//! Retry with exponential backoff for page retrieval.
//!
//! Transient failures (HTTP 429 and network errors) are retried; everything
//! else is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Executes `operation`, retrying transient errors up to `max_retries` times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// or the server's `Retry-After` when that is longer.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let ScraperError::RateLimited {
            retry_after_secs, ..
        } = &err
        {
            delay_secs = delay_secs.max(*retry_after_secs);
        }
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
