//! Fixed-window admission gate for external calls
//!
//! A window opens on the first call after expiry. Calls inside an open window
//! bump the counter; the call that brings it to the limit waits out the rest
//! of the window and then opens a fresh one with an empty counter.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use shared::{SharedError, SharedResult, component_warn};

/// Call budget per window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub calls: u32,
    pub period: Duration,
}

impl RateLimitConfig {
    /// Budget for the classification service
    pub const CLASSIFIER: Self = Self { calls: 50, period: Duration::from_secs(60) };

    /// Budget for the CRM API
    pub const CRM: Self = Self { calls: 10, period: Duration::from_secs(1) };

    pub fn new(calls: u32, period: Duration) -> SharedResult<Self> {
        if calls == 0 {
            return Err(SharedError::InvalidConfig {
                field: "rate_limit.calls".to_string(),
                value: calls.to_string(),
            });
        }
        if period.is_zero() {
            return Err(SharedError::InvalidConfig {
                field: "rate_limit.period".to_string(),
                value: format!("{period:?}"),
            });
        }
        Ok(Self { calls, period })
    }
}

#[derive(Debug, Default)]
struct Window {
    started: Option<Instant>,
    count: u32,
}

/// Shared admission gate, one instance per external service per run
#[derive(Debug)]
pub struct RateLimiter {
    name: &'static str,
    config: RateLimitConfig,
    window: Mutex<Window>,
}

impl RateLimiter {
    pub fn new(name: &'static str, config: RateLimitConfig) -> Self {
        Self {
            name,
            config,
            window: Mutex::new(Window::default()),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Wait until the caller may issue one external call
    ///
    /// The whole check-and-update runs under the lock, including the wait on a
    /// saturated window, so concurrent callers can never overshoot the budget.
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;
        let now = Instant::now();

        match window.started {
            Some(started) if now.duration_since(started) < self.config.period => {
                window.count += 1;
                if window.count >= self.config.calls {
                    let remaining = self.config.period.saturating_sub(now.duration_since(started));
                    if !remaining.is_zero() {
                        component_warn!(
                            self.name,
                            sleep_secs = remaining.as_secs_f64(),
                            "Rate limit reached. Sleeping for {:.2} seconds.",
                            remaining.as_secs_f64()
                        );
                        tokio::time::sleep(remaining).await;
                    }
                    window.started = Some(Instant::now());
                    window.count = 0;
                }
            }
            _ => {
                window.started = Some(now);
                window.count = 1;
            }
        }
    }

    /// Calls counted against the current window
    pub async fn calls_in_window(&self) -> u32 {
        self.window.lock().await.count
    }
}
