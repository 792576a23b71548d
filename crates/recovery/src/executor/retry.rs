//! Bounded retry loop shared by the retry actions

use faultline_core::{Error, Result, RetryableOperation};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Call `operation` at most `max_retries` times, sleeping `pause(attempt)`
/// after every failed attempt but the last
///
/// `attempts` is bumped before each call so the count survives a timeout
/// that drops this future mid-wait.
pub(crate) async fn retry_with<P>(
    operation: &RetryableOperation,
    max_retries: u32,
    attempts: &AtomicU32,
    pause: P,
) -> Result<Value>
where
    P: Fn(u32) -> Duration,
{
    let mut last_error = None;

    for attempt in 0..max_retries {
        attempts.fetch_add(1, Ordering::SeqCst);
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                let is_last = attempt + 1 >= max_retries;
                if is_last {
                    warn!(attempt = attempt + 1, error = %e, "Final retry attempt failed");
                } else {
                    let delay = pause(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries,
                        delay_ms = super::whole_millis(delay),
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    let last = last_error.unwrap_or_else(|| Error::operation("no attempts permitted by strategy"));
    Err(Error::retries_exhausted(max_retries, last))
}
