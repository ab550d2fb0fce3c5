//! Retry with exponential backoff for transient transport failures.
//!
//! Only HTTP 429 and network-level errors are retried. Any other status is
//! returned to the caller after the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::MagentoError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

fn is_retriable(err: &MagentoError) -> bool {
    matches!(
        err,
        MagentoError::RateLimited { .. } | MagentoError::Http(_)
    )
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times.
///
/// The wait before retry `n` is `backoff_base_secs * 2^(n-1)` seconds, capped
/// at one minute and spread by ±25 % jitter. A server-supplied
/// `Retry-After` longer than the computed delay is honoured instead, within
/// the same cap.
///
/// | Retry | Sleep (`backoff_base_secs = 2`) |
/// |-------|---------------------------------|
/// | 1     | 2 s ± 25 %                      |
/// | 2     | 4 s ± 25 %                      |
/// | 3     | 8 s ± 25 %                      |
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, MagentoError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MagentoError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(backoff_base_secs, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Magento error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(backoff_base_secs: u64, attempt: u32, err: &MagentoError) -> u64 {
    let computed = backoff_base_secs
        .saturating_mul(1000)
        .saturating_mul(1u64 << (attempt - 1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed.min(MAX_DELAY_MS) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let requested = match err {
        MagentoError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(requested).min(MAX_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited(retry_after_secs: u64) -> MagentoError {
        MagentoError::RateLimited {
            path: "/V1/products".to_owned(),
            retry_after_secs,
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, MagentoError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited(0))
                } else {
                    Ok::<u32, MagentoError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, MagentoError>(rate_limited(0))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(MagentoError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn api_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, MagentoError>(MagentoError::Api {
                    status: 404,
                    path: "/V1/products/missing".to_owned(),
                    body: None,
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(MagentoError::Api { status: 404, .. })));
    }

    #[test]
    fn delay_stays_within_jitter_band() {
        let err = rate_limited(0);
        for _ in 0..50 {
            let delay = backoff_delay_ms(2, 2, &err);
            assert!((3_000..=5_000).contains(&delay), "delay {delay}");
        }
    }

    #[test]
    fn retry_after_extends_short_backoff() {
        assert_eq!(backoff_delay_ms(0, 1, &rate_limited(5)), 5_000);
    }

    #[test]
    fn delay_is_capped() {
        assert_eq!(backoff_delay_ms(0, 1, &rate_limited(3_600)), MAX_DELAY_MS);
        assert!(backoff_delay_ms(1_000, 10, &rate_limited(0)) <= MAX_DELAY_MS);
    }
}
