//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
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

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(
            r#"
            [listener]
            host = "127.0.0.1"
            port = "8181"

            [shutdown]
            graceful_timeout_secs = 10
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.address(), "127.0.0.1:8181");
        assert_eq!(config.shutdown.graceful_timeout_secs, 10);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = write_config(
            r#"
            [listener]
            port = "99999"
            "#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("99999"));
    }

    #[test]
    fn test_load_reports_parse_and_io_errors() {
        let file = write_config("[listener\nport = 1");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));

        let missing = Path::new("/nonexistent/route-registrar.toml");
        assert!(matches!(load_config(missing), Err(ConfigError::Io(_))));
    }
}
