//! Relay server: accept loop and shared state.
//!
//! # Responsibilities
//! - Own the shared stats, rate limiter and forwarder
//! - Start background tasks (window reset, stats report)
//! - Accept connections and spawn one handler task per connection

use std::sync::Arc;
use std::time::Duration;

use crate::config::RelayConfig;
use crate::net::Listener;
use crate::observability::stats::{spawn_reporter, Stats};
use crate::relay::handler::{ConnectionHandler, RelayContext};
use crate::security::RateLimiter;
use crate::upstream::Forwarder;

/// Pause after a failed accept so descriptor exhaustion does not spin the loop.
const ACCEPT_ERROR_DELAY: Duration = Duration::from_millis(100);

/// Line relay server.
pub struct RelayServer<F> {
    config: RelayConfig,
    stats: Arc<Stats>,
    limiter: Arc<RateLimiter>,
    context: Arc<RelayContext<F>>,
}

impl<F: Forwarder> RelayServer<F> {
    /// Create a new server forwarding through `forwarder`.
    pub fn new(config: RelayConfig, forwarder: F) -> Self {
        let stats = Arc::new(Stats::new());
        let limiter = Arc::new(RateLimiter::from_config(
            &config.rate_limit,
            Arc::clone(&stats),
        ));
        let context = Arc::new(RelayContext::new(
            &config,
            Arc::new(forwarder),
            Arc::clone(&limiter),
        ));

        Self {
            config,
            stats,
            limiter,
            context,
        }
    }

    /// Shared counters, for reporting and tests.
    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    /// Accept connections forever.
    ///
    /// Accept errors are logged and the loop continues. Only process exit stops it.
    pub async fn run(self, listener: Listener) {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                address = %addr,
                rate_limit = ?self.limiter.limit(),
                "Relay server starting"
            );
        }

        let _window_reset = self.limiter.spawn_window_reset();

        let _reporter = match self.config.observability.stats_interval_secs {
            0 => None,
            secs => Some(spawn_reporter(
                Arc::clone(&self.stats),
                Duration::from_secs(secs),
            )),
        };

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_ERROR_DELAY).await;
                    continue;
                }
            };

            let guard = self.stats.track_connection();
            let handler = ConnectionHandler::new(stream, peer, guard, Arc::clone(&self.context));
            tokio::spawn(handler.serve());
        }
    }
}
