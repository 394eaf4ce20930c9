use std::{future::Future, time::Duration, time::Instant};

use dsync_observability::record_remote_request;

use crate::error::{DestinationClientError, Result};

/// Outcome of a single attempt, classified for the retry loop.
pub(crate) enum AttemptError {
    /// Transport failures and 5xx responses
    Retryable(DestinationClientError),
    /// 4xx responses and decoding failures
    Permanent(DestinationClientError),
}

impl AttemptError {
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        let error = DestinationClientError::UnexpectedStatus { status, body };
        if status >= 500 {
            Self::Retryable(error)
        } else {
            Self::Permanent(error)
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(error: reqwest::Error) -> Self {
        Self::Retryable(DestinationClientError::Http(error))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    attempts: u32,
    interval: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    /// Run `attempt` until it succeeds, fails permanently, or attempts run out.
    pub(crate) async fn run<T, F, Fut>(&self, operation: &'static str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, AttemptError>>,
    {
        let started = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match attempt().await {
                Ok(value) => {
                    record_remote_request(operation, "ok", attempts, started.elapsed());
                    return Ok(value);
                }
                Err(AttemptError::Permanent(error)) => {
                    let status = if error.is_not_found() {
                        "not_found"
                    } else {
                        "error"
                    };
                    record_remote_request(operation, status, attempts, started.elapsed());
                    return Err(error);
                }
                Err(AttemptError::Retryable(error)) => {
                    if attempts >= self.attempts {
                        record_remote_request(operation, "exhausted", attempts, started.elapsed());
                        return Err(DestinationClientError::RetriesExhausted {
                            attempts,
                            last: Box::new(error),
                        });
                    }

                    tracing::warn!(
                        operation,
                        attempt = attempts,
                        max_attempts = self.attempts,
                        error = %error,
                        "Destination registry request failed, retrying"
                    );
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}
