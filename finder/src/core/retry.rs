//! Bounded exponential backoff around classifier calls

use std::future::Future;
use std::time::Duration;

use shared::{ClassifierFailure, component_debug, component_warn};
use crate::core::rate_limiter::RateLimiter;

/// Attempt budget and backoff unit
///
/// The wait after failed attempt `n` (0-based) is `(2^n + 1) * backoff_unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit * (2u32.saturating_pow(attempt).saturating_add(1))
    }
}

/// How a retried call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Completed(T),
    /// Non rate-limit failure; never retried
    Failed(ClassifierFailure),
    /// Every attempt was rate limited
    Exhausted { attempts: u32 },
}

/// Run `call` under `policy`, asking `limiter` for admission before each attempt
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    limiter: &RateLimiter,
    mut call: F,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClassifierFailure>>,
{
    for attempt in 0..policy.max_attempts {
        limiter.acquire().await;

        match call().await {
            Ok(value) => return RetryOutcome::Completed(value),
            Err(failure) if failure.is_rate_limit() => {
                if attempt + 1 < policy.max_attempts {
                    let wait = policy.backoff_for(attempt);
                    component_warn!(
                        "retry",
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limit error. Retrying in {} seconds...",
                        wait.as_secs_f64()
                    );
                    tokio::time::sleep(wait).await;
                }
            }
            Err(failure) => {
                component_debug!("retry", attempt, "Not retrying failure: {}", failure);
                return RetryOutcome::Failed(failure);
            }
        }
    }

    component_warn!("retry", attempts = policy.max_attempts, "Max retries reached. Skipping this comparison.");
    RetryOutcome::Exhausted { attempts: policy.max_attempts }
}
