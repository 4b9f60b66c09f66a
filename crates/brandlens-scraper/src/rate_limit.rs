//! Retry and politeness delays for outbound page fetches.
//!
//! Transient failures (gateway errors, dropped connections) are retried with
//! exponential backoff. Responses that signal the platform is refusing
//! automated traffic (403, 429, 999) are retried too, but wait three times as
//! long. Everything else is propagated on the first failure.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ScraperError;

/// Multiplier applied to the backoff delay after a [`ScraperError::Blocked`].
const BLOCKED_BACKOFF_FACTOR: u64 = 3;

/// Upper bound on any single backoff sleep.
const MAX_BACKOFF_MS: u64 = 30_000;

/// Returns `true` if `err` is worth another attempt.
///
/// Retriable:
/// - [`ScraperError::Http`]: connection reset, DNS hiccup, timeout.
/// - [`ScraperError::Blocked`]: 403/429/999, retried with extended backoff.
/// - [`ScraperError::UnexpectedStatus`] for 500, 502, 503 and 504.
///
/// Everything else (404, invalid URL, bad configuration) fails immediately.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) | ScraperError::Blocked { .. } => true,
        ScraperError::UnexpectedStatus { status, .. } => {
            matches!(status, 500 | 502 | 503 | 504)
        }
        _ => false,
    }
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`, tripled for
/// blocked responses, capped at [`MAX_BACKOFF_MS`].
fn backoff_delay_ms(err: &ScraperError, attempt: u32, backoff_base_ms: u64) -> u64 {
    let delay = backoff_base_ms.saturating_mul(1u64 << attempt.min(32));
    let delay = if matches!(err, ScraperError::Blocked { .. }) {
        delay.saturating_mul(BLOCKED_BACKOFF_FACTOR)
    } else {
        delay
    };
    delay.min(MAX_BACKOFF_MS)
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// `max_retries` is the number of additional attempts after the first, so
/// `max_retries = 2` means at most three requests. The last error is returned
/// once retries are exhausted.
///
/// | Retry | Sleep (base = 500 ms) | Sleep after 403/429/999 |
/// |-------|-----------------------|-------------------------|
/// | 1     | 500 ms                | 1.5 s                   |
/// | 2     | 1 s                   | 3 s                     |
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
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
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_ms = backoff_delay_ms(&err, attempt, backoff_base_ms);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}

/// Random pause in `[0, max_ms]` taken before each request.
///
/// Computed synchronously so the thread-local RNG never lives across an
/// `.await`.
pub(crate) fn jitter_delay(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn blocked() -> ScraperError {
        ScraperError::Blocked {
            status: 429,
            url: "https://example.com/acme".to_owned(),
        }
    }

    fn status(code: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: code,
            url: "https://example.com/acme".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_blocked_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(blocked())
                } else {
                    Ok::<u32, ScraperError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(status(503))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(status(404))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[test]
    fn retriable_statuses() {
        for code in [500, 502, 503, 504] {
            assert!(is_retriable(&status(code)), "{code}");
        }
        for code in [400, 401, 404, 410] {
            assert!(!is_retriable(&status(code)), "{code}");
        }
        assert!(is_retriable(&blocked()));
    }

    #[test]
    fn blocked_backoff_is_tripled_and_capped() {
        assert_eq!(backoff_delay_ms(&status(503), 0, 500), 500);
        assert_eq!(backoff_delay_ms(&status(503), 1, 500), 1_000);
        assert_eq!(backoff_delay_ms(&blocked(), 1, 500), 3_000);
        assert_eq!(backoff_delay_ms(&blocked(), 20, 500), MAX_BACKOFF_MS);
    }

    #[test]
    fn jitter_delay_respects_bound() {
        assert_eq!(jitter_delay(0), Duration::ZERO);
        for _ in 0..50 {
            assert!(jitter_delay(25) <= Duration::from_millis(25));
        }
    }
}
