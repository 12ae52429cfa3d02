//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read and parse a TOML file without validating it.
///
/// Callers overlaying further settings validate the merged result themselves.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let file_name = format!("telnet-relay-{}-{}.toml", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_valid_file() {
        let path = write_temp(
            "valid",
            r#"
            [listener]
            port = 2323

            [upstream]
            url = "https://upstream.example/test"
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.port, 2323);
        assert_eq!(config.upstream.url, "https://upstream.example/test");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/telnet-relay.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = write_temp("malformed", "[listener\nport = ");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn invalid_values_are_reported_together() {
        let path = write_temp(
            "invalid",
            r#"
            [listener]
            idle_timeout_secs = 0
            read_buffer_size = 0
            "#,
        );

        let err = load_config(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("idle_timeout_secs"));
        assert!(message.contains("read_buffer_size"));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn read_config_skips_validation() {
        let path = write_temp(
            "unvalidated",
            r#"
            [upstream]
            url = "not a url"
            "#,
        );

        let config = read_config(&path).unwrap();
        assert_eq!(config.upstream.url, "not a url");
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));

        fs::remove_file(path).unwrap();
    }
}
