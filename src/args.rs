//! Command-line argument parsing.
//!
//! Flags override values from the optional config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{read_config, validate_config, ConfigError, RelayConfig};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "telnet-relay")]
#[command(about = "Relays telnet command lines to an HTTP endpoint", long_about = None)]
pub struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to listen on (empty for all interfaces)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen and serve telnet on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Requests per second before upstream calls are delayed, disabled when <= 0
    #[arg(long, allow_negative_numbers = true)]
    pub limit_per_second: Option<i64>,

    /// Upstream URL every command line is POSTed to
    #[arg(long)]
    pub upstream_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Seconds between stats reports, 0 to disable
    #[arg(long)]
    pub stats_interval: Option<u64>,
}

impl Args {
    /// Overlay every flag that was given on top of `config`.
    pub fn apply(&self, mut config: RelayConfig) -> RelayConfig {
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(limit) = self.limit_per_second {
            config.rate_limit.requests_per_second = limit;
        }
        if let Some(url) = &self.upstream_url {
            config.upstream.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(secs) = self.stats_interval {
            config.observability.stats_interval_secs = secs;
        }
        config
    }

    /// Read the config file (or defaults), apply flags, then validate once.
    pub fn resolve_config(&self) -> Result<RelayConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => read_config(path)?,
            None => RelayConfig::default(),
        };

        let config = self.apply(base);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
