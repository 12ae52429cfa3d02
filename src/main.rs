//! Telnet line relay (v1)
//!
//! Accepts telnet-style connections and forwards every command line to a
//! fixed HTTP endpoint, writing the upstream response back to the client.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  TELNET RELAY                     │
//!                        │                                                   │
//!     Client lines       │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!     ───────────────────┼─▶│   net   │──▶│  relay   │──▶│   protocol   │   │
//!                        │  │listener │   │ handler  │   │ line splitter│   │
//!                        │  └─────────┘   └────┬─────┘   └──────────────┘   │
//!                        │                     │                             │
//!                        │                     ▼                             │
//!                        │              ┌──────────────┐                     │
//!                        │              │   security   │                     │
//!                        │              │ rate limiter │                     │
//!                        │              └──────┬───────┘                     │
//!                        │                     ▼                             │
//!     Echo + response    │              ┌──────────────┐                     │
//!     ◀──────────────────┼──────────────│   upstream   │◀────────────────────┼──── HTTP
//!                        │              │  forwarder   │                     │     endpoint
//!                        │              └──────────────┘                     │
//!                        │                                                   │
//!                        │  config · observability (logging, stats, metrics) │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use clap::Parser;

use telnet_relay::args::Args;
use telnet_relay::net::Listener;
use telnet_relay::observability::{logging, metrics};
use telnet_relay::{HttpForwarder, RelayServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    logging::init_logging(&config.observability);

    tracing::info!("telnet-relay v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        idle_timeout_secs = config.listener.idle_timeout_secs,
        requests_per_second = config.rate_limit.requests_per_second,
        upstream = %config.upstream.url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = match Listener::bind(&config.listener).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start listener");
            return Err(e.into());
        }
    };

    let forwarder = HttpForwarder::new(config.upstream.clone())?;
    let server = RelayServer::new(config, forwarder);

    tokio::select! {
        _ = server.run(listener) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
