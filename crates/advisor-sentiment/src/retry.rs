//! Retry with exponential back-off and jitter for source adapter requests.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::SentimentError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// Retriable: request timeouts, connection failures, HTTP 429 and 5xx.
/// Everything else (4xx, malformed XML, Reddit auth failures) is returned
/// immediately.
pub(crate) fn is_retriable(err: &SentimentError) -> bool {
    match err {
        SentimentError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|s| {
                    s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error()
                })
        }
        SentimentError::Xml(_)
        | SentimentError::Reddit(_)
        | SentimentError::Pattern(_)
        | SentimentError::Config(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors.
///
/// Reddit and Google News both answer bursts with 429 rather than 503, so rate
/// limiting backs off like a server error. Neither reliably sends
/// `Retry-After`, and `reqwest::Error` does not carry headers, so the delay is
/// always computed: see [`base_delay_ms`] and [`jittered_ms`].
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SentimentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SentimentError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retries < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };

        retries += 1;
        let delay_ms = jittered_ms(base_delay_ms(backoff_base_ms, retries), rand::random());
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms,
            error = %err,
            "transient source error, backing off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Un-jittered delay before retry number `retry` (1-based):
/// `backoff_base_ms * 2^(retry-1)`, capped at 60 s.
fn base_delay_ms(backoff_base_ms: u64, retry: u32) -> u64 {
    let doublings = retry.saturating_sub(1).min(10);
    backoff_base_ms
        .saturating_mul(1u64 << doublings)
        .min(MAX_DELAY_MS)
}

/// Spread `delay_ms` over 75 % to 125 % using `jitter` in `[0, 1)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jittered_ms(delay_ms: u64, jitter: f64) -> u64 {
    (delay_ms as f64 * (0.75 + jitter.clamp(0.0, 1.0) * 0.5)) as u64
}
