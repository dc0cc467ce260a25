use crate::fetch::error::FetchError;
use crate::fetch::Transport;
use log::debug;

/// Result of a bounded retry loop that did not hit a fatal error.
#[derive(Debug)]
pub enum RetryOutcome {
    Fetched(String),
    /// Every attempt failed with a recoverable error; `last_error` is the
    /// failure of the final attempt.
    Exhausted { attempts: u32, last_error: FetchError },
}

/// Fetches `url` up to `max_attempts` times (at least once), retrying only
/// recoverable failures. Any other error is returned immediately.
pub fn get_with_retry<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    max_attempts: u32,
) -> Result<RetryOutcome, FetchError> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match transport.get_text(url) {
            Ok(body) => return Ok(RetryOutcome::Fetched(body)),
            Err(e) if e.is_recoverable() => {
                if attempt >= max_attempts {
                    return Ok(RetryOutcome::Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                debug!("Attempt {}/{} for {} failed: {}", attempt, max_attempts, url, e);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
