//! Process-wide connection and request counters.
//!
//! # Responsibilities
//! - Count current and total connections
//! - Count requests admitted in the current rate window and in total
//! - Periodically report a human-readable snapshot
//!
//! # Design Decisions
//! - A single mutex guards all four counters, so a window reset can never
//!   interleave with an admission check-and-increment
//! - Connection teardown goes through `ConnectionGuard`, which decrements
//!   exactly once on drop
//! - The active-connections gauge is published under the same lock, so the
//!   last published value is always the current count

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::net::connection::{ConnectionGuard, ConnectionId};
use crate::observability::metrics;

#[derive(Debug, Default)]
struct Counters {
    current_connections: u64,
    total_connections: u64,
    window_requests: u64,
    total_requests: u64,
}

/// Shared counters observed by the stats reporter and mutated by
/// connection handlers and the rate limiter.
#[derive(Debug, Default)]
pub struct Stats {
    counters: Mutex<Counters>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub current_connections: u64,
    pub total_connections: u64,
    pub window_requests: u64,
    pub total_requests: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // Counters stay consistent even if a holder panicked; every update is a single statement.
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a newly accepted connection. The returned guard records its close.
    pub fn track_connection(self: &Arc<Self>) -> ConnectionGuard {
        {
            let mut counters = self.lock();
            counters.current_connections += 1;
            counters.total_connections += 1;
            metrics::record_connection_opened(counters.current_connections);
        }
        ConnectionGuard::new(Arc::clone(self), ConnectionId::new())
    }

    pub(crate) fn connection_closed(&self) {
        let mut counters = self.lock();
        counters.current_connections = counters.current_connections.saturating_sub(1);
        metrics::record_active_connections(counters.current_connections);
    }

    /// Admit one request if the window holds fewer than `limit` requests.
    ///
    /// Check and increment happen under the same lock.
    pub fn try_admit(&self, limit: u64) -> bool {
        let mut counters = self.lock();
        if counters.window_requests >= limit {
            return false;
        }
        counters.window_requests += 1;
        counters.total_requests += 1;
        drop(counters);

        metrics::record_request_admitted();
        true
    }

    /// Start a new rate window.
    pub fn reset_window(&self) {
        self.lock().window_requests = 0;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let counters = self.lock();
        StatsSnapshot {
            current_connections: counters.current_connections,
            total_connections: counters.total_connections,
            window_requests: counters.window_requests,
            total_requests: counters.total_requests,
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "connections: {} current / {} total, requests: {} this second / {} total",
            self.current_connections,
            self.total_connections,
            self.window_requests,
            self.total_requests
        )
    }
}

/// Log a stats snapshot every `interval` until the process exits.
pub fn spawn_reporter(stats: Arc<Stats>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let snapshot = stats.snapshot();
            tracing::info!(
                current_connections = snapshot.current_connections,
                total_connections = snapshot.total_connections,
                window_requests = snapshot.window_requests,
                total_requests = snapshot.total_requests,
                "stats: {}",
                snapshot
            );
        }
    })
}
