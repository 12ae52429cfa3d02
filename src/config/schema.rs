//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, idle timeout).
    pub listener: ListenerConfig,

    /// Process-wide request rate limit.
    pub rate_limit: RateLimitConfig,

    /// Upstream endpoint every command line is forwarded to.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to listen on. Empty means all interfaces.
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Sliding idle timeout in seconds, renewed on every successful read.
    pub idle_timeout_secs: u64,

    /// Size of a single read from the client socket.
    pub read_buffer_size: usize,
}

impl ListenerConfig {
    /// Render the address to bind, e.g. "0.0.0.0:23".
    pub fn bind_address(&self) -> String {
        let host = if self.host.is_empty() {
            "0.0.0.0"
        } else {
            self.host.as_str()
        };
        format!("{}:{}", host, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 23,
            idle_timeout_secs: 10,
            read_buffer_size: 1024,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per one-second window. Zero or negative disables limiting.
    pub requests_per_second: i64,

    /// Delay between admission rechecks while the window is full, in microseconds.
    pub retry_delay_micros: u64,
}

impl RateLimitConfig {
    pub fn is_enabled(&self) -> bool {
        self.requests_per_second > 0
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_micros(self.retry_delay_micros)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: -1,
            retry_delay_micros: 100,
        }
    }
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fixed URL every admitted line is POSTed to.
    pub url: String,

    /// Content-Type header of the outbound request.
    pub content_type: String,

    /// Form parameter name carrying the line.
    pub form_field: String,

    /// Percent-encode the line in the form body. Off sends the line byte-for-byte.
    pub url_encode_input: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/test".to_string(),
            content_type: "application/x-www-form-urlencoded".to_string(),
            form_field: "input".to_string(),
            url_encode_input: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Interval of the periodic stats report in seconds. Zero disables it.
    pub stats_interval_secs: u64,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            stats_interval_secs: 0,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
