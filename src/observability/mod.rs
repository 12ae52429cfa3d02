//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Connection handlers and the rate limiter produce:
//!     → logging.rs (structured log events, one span per connection)
//!     → stats.rs (shared counters, periodic report)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log output (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
pub mod stats;

pub use stats::{Stats, StatsSnapshot};
