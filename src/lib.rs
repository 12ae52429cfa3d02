//! Telnet line relay library.

pub mod args;
pub mod config;
pub mod net;
pub mod observability;
pub mod protocol;
pub mod relay;
pub mod security;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use relay::RelayServer;
pub use upstream::HttpForwarder;
