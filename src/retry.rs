//! Retry logic with exponential backoff
//!
//! Upstream calls go through [`execute_with_retry`], which retries transient
//! failures with deterministic (jitter-free) exponential backoff and honours a
//! [`CancellationToken`] both while an attempt is in flight and while sleeping.
//!
//! # Example
//!
//! ```no_run
//! use marvel_forwarder::config::RetryConfig;
//! use marvel_forwarder::retry::execute_with_retry;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> marvel_forwarder::Result<()> {
//! let config = RetryConfig::with_max_retries(3);
//! let cancel = CancellationToken::new();
//! let value = execute_with_retry(&config, &cancel, || async {
//!     Ok::<_, marvel_forwarder::Error>(42)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (connection errors, non-200 upstream answers) return `true`.
/// Anything a second attempt cannot fix (malformed payloads, bad configuration,
/// write failures) returns `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::UpstreamStatus { .. } => true,
            // Terminal outcomes of an earlier retry loop or of the caller
            Error::ExhaustedRetries { .. } | Error::Cancelled => false,
            // A malformed body will be just as malformed next time
            Error::Decode(_) => false,
            Error::InitialFetchFailed(_) | Error::PartialFetchFailed { .. } => false,
            Error::InvalidLimit(_) | Error::Config { .. } => false,
            // Writes are never retried here; that is the caller's decision
            Error::Write(_) | Error::Database(_) => false,
            Error::NotFound { .. } | Error::MalformedId(_) => false,
            Error::Io(_) | Error::ApiServerError(_) | Error::Other(_) => false,
        }
    }
}

/// Execute an async operation with bounded exponential backoff
///
/// * `max_retries = 0` makes exactly one attempt.
/// * A retryable failure after the budget is spent returns
///   [`Error::ExhaustedRetries`] wrapping the last error.
/// * A non-retryable failure is returned unchanged, immediately.
/// * Cancellation returns [`Error::Cancelled`], dropping any in-flight attempt.
pub async fn execute_with_retry<F, Fut, T>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut retries = 0u32;
    let mut delay = config.initial_interval;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            outcome = operation() => outcome,
        };

        match outcome {
            Ok(value) => {
                if retries > 0 {
                    tracing::info!(attempts = retries + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!(error = %e, "Operation failed with non-retryable error");
                return Err(e);
            }
            Err(e) => {
                let attempts = retries + 1;
                if retries >= config.max_retries
                    || started.elapsed() + delay > config.max_elapsed_time
                {
                    tracing::error!(
                        error = %e,
                        attempts,
                        "Operation failed after all retry attempts exhausted"
                    );
                    return Err(Error::ExhaustedRetries {
                        attempts,
                        last: Box::new(e),
                    });
                }

                retries += 1;
                tracing::warn!(
                    error = %e,
                    attempt = retries,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis(),
                    "Operation failed, retrying"
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }

                delay = next_delay(config, delay);
            }
        }
    }
}

fn next_delay(config: &RetryConfig, current: Duration) -> Duration {
    Duration::from_secs_f64(current.as_secs_f64() * config.multiplier).min(config.max_interval)
}
