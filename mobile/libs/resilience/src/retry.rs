/// Retry policy with exponential backoff and jitter
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first call)
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add random jitter to backoff (±30%)
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    /// The predicate classified the error as permanent
    #[error("Non-retryable failure: {0}")]
    Aborted(E),
}

impl<E> RetryError<E> {
    /// The error from the last attempt
    pub fn into_inner(self) -> E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Aborted(e) => e,
        }
    }

    pub fn last_error(&self) -> &E {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Aborted(e) => e,
        }
    }
}

/// Execute a future with retry logic, retrying every error
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, f: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    with_retry_if(config, f, |_| true).await
}

/// Execute a future with retry logic, retrying only errors accepted by `should_retry`
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    mut f: F,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    let mut backoff = config.initial_backoff;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    return Err(RetryError::Aborted(e));
                }

                attempt += 1;

                if attempt > config.max_retries {
                    warn!(error = %e, "Max retries ({}) reached", config.max_retries);
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }

                let delay = calculate_backoff(backoff, config.jitter);

                warn!(
                    error = %e,
                    "Retry attempt {}/{}, waiting {:?}",
                    attempt, config.max_retries, delay
                );

                tokio::time::sleep(delay).await;

                // Exponential backoff
                backoff = Duration::from_millis(
                    ((backoff.as_millis() as f64 * config.backoff_multiplier)
                        .min(config.max_backoff.as_millis() as f64)) as u64,
                );
            }
        }
    }
}

fn calculate_backoff(base: Duration, jitter: bool) -> Duration {
    if jitter {
        let mut rng = rand::thread_rng();
        let jitter_factor = 1.0 + rng.gen_range(-0.3..0.3); // ±30%
        Duration::from_millis((base.as_millis() as f64 * jitter_factor) as u64)
    } else {
        base
    }
}
