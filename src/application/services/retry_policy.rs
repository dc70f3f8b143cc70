use std::fmt;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fixed-delay retry with a reconnect hook that runs before every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `operation` up to `max_attempts` times and returns the last error on exhaustion.
    /// A failed `reconnect` consumes the attempt it preceded.
    pub async fn execute<T, E, Op, OpFut, Re, ReFut>(
        &self,
        mut operation: Op,
        mut reconnect: Re,
    ) -> Result<T, E>
    where
        Op: FnMut() -> OpFut,
        OpFut: Future<Output = Result<T, E>>,
        Re: FnMut() -> ReFut,
        ReFut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let mut attempt = 1;
        loop {
            let result = if attempt > 1 {
                tracing::debug!(attempt, "Recreating backend connection before retry");
                match reconnect().await {
                    Ok(()) => operation().await,
                    Err(e) => Err(e),
                }
            } else {
                operation().await
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    tracing::error!(attempts = attempt, error = %e, "Write failed, retries exhausted");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Write attempt failed");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}
