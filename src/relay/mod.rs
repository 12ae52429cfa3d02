//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! server.rs (accept loop)
//!     → handler.rs (one task per connection)
//!         → protocol::lines (split chunk into lines)
//!         → security::rate_limit (admission)
//!         → upstream::forwarder (POST line, read body)
//!         → protocol::response (echo block written back)
//! ```
//!
//! # Design Decisions
//! - Connections run concurrently; lines within one connection run sequentially
//! - Errors never cross connection boundaries

pub mod handler;
pub mod server;

pub use handler::{CloseReason, ConnectionError, ConnectionHandler, RelayContext};
pub use server::RelayServer;
