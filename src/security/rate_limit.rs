//! Process-wide request rate limiting.
//!
//! A fixed one-second window shared by every connection. A background task
//! resets the window counter once per second; callers that find the window
//! full sleep briefly and recheck. Waiters are not queued, so admission
//! order across connections is unspecified.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::RateLimitConfig;
use crate::observability::Stats;

/// Length of one accounting window.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Admission gate in front of the upstream forwarder.
#[derive(Debug)]
pub struct RateLimiter {
    /// `None` when limiting is disabled.
    limit: Option<u64>,
    retry_delay: Duration,
    stats: Arc<Stats>,
}

impl RateLimiter {
    /// Create a limiter admitting at most `limit` requests per window.
    /// A `limit` of zero or less disables limiting.
    pub fn new(limit: i64, retry_delay: Duration, stats: Arc<Stats>) -> Self {
        Self {
            limit: u64::try_from(limit).ok().filter(|&l| l > 0),
            retry_delay,
            stats,
        }
    }

    pub fn from_config(config: &RateLimitConfig, stats: Arc<Stats>) -> Self {
        Self::new(config.requests_per_second, config.retry_delay(), stats)
    }

    pub fn is_enabled(&self) -> bool {
        self.limit.is_some()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Try to take one slot in the current window without waiting.
    ///
    /// Always succeeds, without touching any counter, when limiting is disabled.
    pub fn try_admit(&self) -> bool {
        match self.limit {
            Some(limit) => self.stats.try_admit(limit),
            None => true,
        }
    }

    /// Wait until a slot in the current window is free, then take it.
    pub async fn admit(&self) {
        let Some(limit) = self.limit else {
            return;
        };

        let mut waited = false;
        while !self.stats.try_admit(limit) {
            if !waited {
                tracing::debug!(limit, "Rate window full, waiting for reset");
                waited = true;
            }
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// Start a new window.
    pub fn reset(&self) {
        self.stats.reset_window();
    }

    /// Spawn the task resetting the window once per second.
    ///
    /// Returns `None` when limiting is disabled.
    pub fn spawn_window_reset(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let limit = self.limit?;
        let limiter = Arc::clone(self);

        tracing::info!(limit, "Rate limiter active");
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(WINDOW);
            loop {
                ticker.tick().await;
                limiter.reset();
            }
        }))
    }
}
