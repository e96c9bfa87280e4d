//! Bounded retry with a fixed delay
//!
//! [`RetryPolicy::run`] drives an async operation for at most
//! `max_attempts` attempts and reports a tagged [`RetryOutcome`] instead of
//! propagating the error of an intermediate attempt.

use std::future::Future;
use std::time::Duration;

use crate::config::RetrySettings;
use crate::llm::GenerationError;

/// Errors that know whether another attempt may help
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for GenerationError {
    fn is_retryable(&self) -> bool {
        GenerationError::is_retryable(self)
    }
}

/// Result of a retried operation
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T, E> {
    /// The operation succeeded on attempt `attempts`
    Success { value: T, attempts: u32 },
    /// Every attempt failed with a retryable error
    RetryableFailure { attempts: u32, last_error: E },
    /// An attempt failed with an error that must not be retried
    TerminalFailure { attempts: u32, error: E },
}

impl<T, E> RetryOutcome<T, E> {
    /// Attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts, .. }
            | RetryOutcome::RetryableFailure { attempts, .. }
            | RetryOutcome::TerminalFailure { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success { .. })
    }

    /// Collapse into a plain result carrying the final error
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryOutcome::Success { value, .. } => Ok(value),
            RetryOutcome::RetryableFailure { last_error, .. } => Err(last_error),
            RetryOutcome::TerminalFailure { error, .. } => Err(error),
        }
    }
}

/// Attempt budget and delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least 1
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, settings.delay())
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retries
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails terminally, or the budget is spent
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> RetryOutcome<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "Succeeded after retry");
                    }
                    return RetryOutcome::Success {
                        value,
                        attempts: attempt,
                    };
                }
                Err(error) if !error.is_retryable() => {
                    tracing::warn!(attempt, %error, "Terminal failure, not retrying");
                    return RetryOutcome::TerminalFailure {
                        attempts: attempt,
                        error,
                    };
                }
                Err(error) if attempt >= max_attempts => {
                    tracing::warn!(attempt, %error, "Retry budget exhausted");
                    return RetryOutcome::RetryableFailure {
                        attempts: attempt,
                        last_error: error,
                    };
                }
                Err(error) => {
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        %error,
                        "Attempt failed, retrying"
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
