//! Per-connection command handling.
//!
//! # State Machine
//! ```text
//! Reading → Processing → Writing → Reading ...
//!    │           │           │
//!    └───────────┴───────────┴──→ Closed
//!      (end of stream, read/write error, "quit", idle deadline)
//! ```
//!
//! Every successful read pushes the idle deadline `idle_timeout` into the
//! future. Lines of one chunk are handled in order before the next read.
//! Client bytes are never decoded; only log fields show them lossily.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout_at, Instant};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::net::ConnectionGuard;
use crate::observability::metrics;
use crate::protocol::{frame_response, split_lines, QUIT_COMMAND};
use crate::security::RateLimiter;
use crate::upstream::Forwarder;

/// Why a connection ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client closed its side of the stream.
    PeerClosed,
    /// The client sent the quit command.
    Quit,
    /// Nothing was read before the idle deadline.
    IdleTimeout,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::PeerClosed => "peer_closed",
            CloseReason::Quit => "quit",
            CloseReason::IdleTimeout => "idle_timeout",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end a connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// State shared by every connection handler.
#[derive(Debug)]
pub struct RelayContext<F> {
    pub forwarder: Arc<F>,
    pub limiter: Arc<RateLimiter>,
    pub idle_timeout: Duration,
    pub read_buffer_size: usize,
}

impl<F> RelayContext<F> {
    pub fn new(config: &RelayConfig, forwarder: Arc<F>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            forwarder,
            limiter,
            idle_timeout: config.listener.idle_timeout(),
            read_buffer_size: config.listener.read_buffer_size,
        }
    }
}

/// Owns one client connection from accept to close.
pub struct ConnectionHandler<S, F> {
    stream: S,
    peer: SocketAddr,
    guard: ConnectionGuard,
    context: Arc<RelayContext<F>>,
    deadline: Instant,
}

impl<S, F> ConnectionHandler<S, F>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: Forwarder,
{
    /// Wrap an accepted stream. The idle deadline starts now.
    pub fn new(
        stream: S,
        peer: SocketAddr,
        guard: ConnectionGuard,
        context: Arc<RelayContext<F>>,
    ) -> Self {
        let deadline = Instant::now() + context.idle_timeout;
        Self {
            stream,
            peer,
            guard,
            context,
            deadline,
        }
    }

    /// Run the connection to completion inside its own span, logging how it ended.
    pub async fn serve(self) {
        let span = tracing::info_span!(
            "connection",
            connection_id = %self.guard.id(),
            peer = %self.peer
        );

        async move {
            tracing::info!("New connection");
            match self.run().await {
                Ok(reason) => {
                    tracing::info!(reason = %reason, "Connection closed");
                    metrics::record_connection_closed(reason.as_str());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Connection closed on error");
                    metrics::record_connection_closed("error");
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Read, split and process chunks until the connection ends.
    pub async fn run(mut self) -> Result<CloseReason, ConnectionError> {
        let mut buffer = vec![0u8; self.context.read_buffer_size];

        loop {
            let n = match timeout_at(self.deadline, self.stream.read(&mut buffer)).await {
                Err(_) => return Ok(CloseReason::IdleTimeout),
                Ok(Err(e)) => return Err(ConnectionError::Read(e)),
                Ok(Ok(0)) => return Ok(CloseReason::PeerClosed),
                Ok(Ok(n)) => n,
            };
            self.deadline = Instant::now() + self.context.idle_timeout;

            let chunk = &buffer[..n];
            tracing::debug!(
                size = n,
                message = %String::from_utf8_lossy(chunk),
                "Received chunk"
            );

            for line in split_lines(chunk) {
                if line == QUIT_COMMAND {
                    return Ok(CloseReason::Quit);
                }
                if line.is_empty() {
                    continue;
                }
                self.process_line(&line).await?;
            }
        }
    }

    /// Admit, forward and answer one command line.
    ///
    /// A failed forward is logged and leaves the connection open.
    async fn process_line(&mut self, line: &[u8]) -> Result<(), ConnectionError> {
        self.context.limiter.admit().await;

        let body = match self.context.forwarder.forward(line).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    input = %String::from_utf8_lossy(line),
                    error = %e,
                    "Upstream request failed"
                );
                return Ok(());
            }
        };

        let framed = frame_response(line, &body);
        match timeout_at(self.deadline, self.stream.write_all(&framed)).await {
            Ok(result) => result.map_err(ConnectionError::Write),
            Err(_) => Err(ConnectionError::Write(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "idle deadline elapsed while writing",
            ))),
        }
    }
}
