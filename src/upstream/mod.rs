//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Admitted command line
//!     → forwarder.rs (POST `input=<line>` to the fixed URL)
//!     → full response body returned to the connection handler
//! ```

pub mod forwarder;

pub use forwarder::{ForwardError, Forwarder, HttpForwarder};
