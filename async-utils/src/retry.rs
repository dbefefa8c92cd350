use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Backoff schedule for [`retry`]. The delay before retry `n` (1-based) is
/// `min_timeout * factor^(n - 1)`, capped at `max_timeout`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryOptions {
    /// Retries after the first attempt; `0` runs the operation once.
    pub retries: u32,
    pub factor: f64,
    pub min_timeout: Duration,
    pub max_timeout: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            retries: 10,
            factor: 2.0,
            min_timeout: Duration::from_secs(1),
            max_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryOptions {
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let scaled = self.min_timeout.as_secs_f64() * self.factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_timeout.as_secs_f64() {
            return self.max_timeout;
        }
        Duration::from_secs_f64(scaled.max(0.0))
    }
}

/// Runs `op` until it succeeds or the retry budget is spent, returning the
/// last error. `op` receives the 1-based attempt number.
pub async fn retry<F, Fut, T, E>(mut op: F, options: RetryOptions) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt > options.retries => return Err(err),
            Err(err) => {
                let delay = options.delay_for(attempt);
                tracing::debug!(attempt, ?delay, error = %err, "attempt failed; retrying");
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
