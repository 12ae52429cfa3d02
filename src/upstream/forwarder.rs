//! Upstream request forwarding.
//!
//! # Responsibilities
//! - POST one form-encoded request per admitted line to the fixed endpoint
//! - Read the whole response body before returning
//!
//! # Design Decisions
//! - No retry and no timeout beyond the HTTP client's defaults
//! - The body is returned whatever the status code; only transport and
//!   body-read failures are errors

use std::future::Future;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::observability::metrics;

/// Errors raised while forwarding a single line.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read to completion.
    #[error("reading response body failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// Sends one line upstream and returns the raw response body.
pub trait Forwarder: Send + Sync + 'static {
    fn forward(&self, line: &[u8]) -> impl Future<Output = Result<Vec<u8>, ForwardError>> + Send;
}

/// Forwarder POSTing to a fixed HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: Client,
    config: UpstreamConfig,
}

impl HttpForwarder {
    /// Build a forwarder with a default HTTP client.
    pub fn new(config: UpstreamConfig) -> Result<Self, ForwardError> {
        let client = Client::builder().build().map_err(ForwardError::Client)?;
        Ok(Self::with_client(client, config))
    }

    /// Build a forwarder around an existing client.
    pub fn with_client(client: Client, config: UpstreamConfig) -> Self {
        Self { client, config }
    }

    /// Render the request body for `line`.
    ///
    /// Without `url_encode_input` the line bytes follow `<field>=` unchanged.
    pub fn form_body(&self, line: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.config.form_field.len() + 1 + line.len());
        body.extend_from_slice(self.config.form_field.as_bytes());
        body.push(b'=');
        if self.config.url_encode_input {
            for part in url::form_urlencoded::byte_serialize(line) {
                body.extend_from_slice(part.as_bytes());
            }
        } else {
            body.extend_from_slice(line);
        }
        body
    }
}

impl Forwarder for HttpForwarder {
    async fn forward(&self, line: &[u8]) -> Result<Vec<u8>, ForwardError> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, self.config.content_type.as_str())
            .body(self.form_body(line))
            .send()
            .await
            .map_err(|e| {
                metrics::record_forward("request_error", start);
                ForwardError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "Upstream returned non-success status");
        }

        let body = response.bytes().await.map_err(|e| {
            metrics::record_forward("body_error", start);
            ForwardError::Body(e)
        })?;

        metrics::record_forward("ok", start);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarder(url_encode_input: bool) -> HttpForwarder {
        HttpForwarder::new(UpstreamConfig {
            url_encode_input,
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn raw_body_is_byte_for_byte() {
        let body = forwarder(false).form_body(b"a b&c=d");
        assert_eq!(body, b"input=a b&c=d");
    }

    #[test]
    fn encoded_body_escapes_line() {
        let body = forwarder(true).form_body(b"a b&c=d");
        assert_eq!(body, b"input=a+b%26c%3Dd");
    }

    #[test]
    fn raw_body_keeps_invalid_utf8() {
        assert_eq!(forwarder(false).form_body(b"caf\xe9"), b"input=caf\xe9");
    }

    #[test]
    fn encoded_body_escapes_invalid_utf8() {
        assert_eq!(forwarder(true).form_body(b"caf\xe9"), b"input=caf%E9");
    }

    #[test]
    fn custom_form_field() {
        let forwarder = HttpForwarder::new(UpstreamConfig {
            form_field: "cmd".into(),
            ..UpstreamConfig::default()
        })
        .unwrap();
        assert_eq!(forwarder.form_body(b"ls"), b"cmd=ls");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_request_error() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let socket = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            socket.local_addr().unwrap().port()
        };
        let client = Client::builder().no_proxy().build().unwrap();
        let forwarder = HttpForwarder::with_client(
            client,
            UpstreamConfig {
                url: format!("http://127.0.0.1:{}/test", port),
                ..UpstreamConfig::default()
            },
        );

        let err = forwarder.forward(b"ping").await.unwrap_err();
        assert!(matches!(err, ForwardError::Request(_)));
    }
}
