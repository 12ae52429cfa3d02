//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Non-empty command line:
//!     → rate_limit.rs (process-wide admission, one-second window)
//!     → Pass to upstream forwarder
//! ```
//!
//! # Design Decisions
//! - One global window shared by all connections, not per client
//! - Disabled limiter admits everything without touching counters

pub mod rate_limit;

pub use rate_limit::RateLimiter;
