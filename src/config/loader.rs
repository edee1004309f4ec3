//! Configuration loading from disk and the environment.

use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),

    #[error("Validation failed: {0}")]
    Validation(&'static str),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Final listening port: the CLI flag wins, then the PORT environment
/// variable, then whatever the config carries.
pub fn resolve_port(
    config: &AppConfig,
    cli_port: Option<u16>,
    env_port: Option<&str>,
) -> Result<u16, ConfigError> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    if let Some(raw) = env_port {
        return raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw.to_string()));
    }
    Ok(config.listener.port)
}

/// Semantic checks serde cannot express.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.capture.capacity == 0 {
        return Err(ConfigError::Validation(
            "capture.capacity must be greater than zero",
        ));
    }
    if config.capture.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "capture.max_body_bytes must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.listener.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.capture.capacity, 100);
        assert_eq!(config.capture.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = parse_config(
            r#"
            [listener]
            port = 8080

            [capture]
            capacity = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.capture.capacity, 5);
        assert_eq!(config.capture.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = parse_config("[capture]\ncapacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_port_precedence() {
        let config = parse_config("[listener]\nport = 8080\n").unwrap();

        assert_eq!(resolve_port(&config, Some(9999), Some("4000")).unwrap(), 9999);
        assert_eq!(resolve_port(&config, None, Some("4000")).unwrap(), 4000);
        assert_eq!(resolve_port(&config, None, None).unwrap(), 8080);
        assert_eq!(
            resolve_port(&AppConfig::default(), None, None).unwrap(),
            3000
        );
    }

    #[test]
    fn test_bad_env_port_rejected() {
        let config = AppConfig::default();
        let err = resolve_port(&config, None, Some("not-a-port")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }
}
