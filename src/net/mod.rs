//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop)
//!     → connection.rs (connection ID, lifecycle tracking)
//!     → Hand off to the relay connection handler
//! ```
//!
//! # Design Decisions
//! - Bind and resolve failures are fatal at startup
//! - Each connection tracked until its guard is dropped

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId};
pub use listener::{Listener, ListenerError};
