//! Client line protocol.
//!
//! # Data Flow
//! ```text
//! raw read chunk
//!     → lines.rs (normalize CRLF/CR, split on LF)
//!     → per line: "quit" closes, empty is ignored, anything else is a command
//!     → response.rs (echo block + upstream body written back)
//! ```

pub mod lines;
pub mod response;

pub use lines::split_lines;
pub use response::frame_response;

/// Reserved line that closes the connection.
pub const QUIT_COMMAND: &[u8] = b"quit";
