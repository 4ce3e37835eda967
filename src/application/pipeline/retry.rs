use std::{fmt::Display, future::Future, time::Duration};

use tracing::{debug, error, info, warn};

use crate::{application::error::TransferError, domain::config::TransferConfig};

pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for TransferError {
    fn is_retryable(&self) -> bool {
        TransferError::is_retryable(self)
    }
}

/// Runs an operation up to `max_retries + 1` times with exponential backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor {
    max_retries: u32,
    base_backoff: Duration,
}

impl RetryExecutor {
    pub fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
        }
    }

    pub fn from_config(config: &TransferConfig) -> Self {
        Self::new(config.retry_attempts, config.retry_backoff())
    }

    /// Delay before `attempt`; attempt 0 runs immediately.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.base_backoff.saturating_mul(factor)
    }

    /// The closure receives the zero-based attempt number. Errors that are not
    /// retryable are returned immediately; otherwise the last error is returned
    /// once the budget is spent.
    pub async fn execute<T, E, F, Fut>(&self, name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut attempt = 0u32;
        loop {
            if attempt > 0 {
                let delay = self.backoff_for(attempt);
                debug!(
                    operation = name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }

            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(operation = name, attempt, "Succeeded after retry");
                    } else {
                        debug!(operation = name, "Succeeded on first attempt");
                    }
                    return Ok(value);
                }
                Err(err) if !err.is_retryable() => {
                    warn!(operation = name, attempt, error = %err, "Failed with non-retryable error");
                    return Err(err);
                }
                Err(err) if attempt >= self.max_retries => {
                    error!(
                        operation = name,
                        attempts = attempt + 1,
                        error = %err,
                        "Retry budget exhausted"
                    );
                    return Err(err);
                }
                Err(err) => {
                    warn!(operation = name, attempt, error = %err, "Attempt failed, will retry");
                    attempt += 1;
                }
            }
        }
    }
}
