//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, buffer sizes > 0)
//! - Validate the upstream URL and metrics address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.idle_timeout_secs must be greater than zero")]
    ZeroIdleTimeout,

    #[error("listener.read_buffer_size must be greater than zero")]
    ZeroReadBuffer,

    #[error("rate_limit.retry_delay_micros must be greater than zero when limiting is enabled")]
    ZeroRetryDelay,

    #[error("upstream.url '{url}' is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("upstream.form_field must not be empty")]
    EmptyFormField,

    #[error("upstream.content_type must not be empty")]
    EmptyContentType,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, returning every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.idle_timeout_secs == 0 {
        errors.push(ValidationError::ZeroIdleTimeout);
    }
    if config.listener.read_buffer_size == 0 {
        errors.push(ValidationError::ZeroReadBuffer);
    }

    if config.rate_limit.is_enabled() && config.rate_limit.retry_delay_micros == 0 {
        errors.push(ValidationError::ZeroRetryDelay);
    }

    match url::Url::parse(&config.upstream.url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ValidationError::InvalidUpstreamUrl {
            url: config.upstream.url.clone(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUpstreamUrl {
            url: config.upstream.url.clone(),
            reason: e.to_string(),
        }),
    }
    if config.upstream.form_field.is_empty() {
        errors.push(ValidationError::EmptyFormField);
    }
    if config.upstream.content_type.is_empty() {
        errors.push(ValidationError::EmptyContentType);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
