//! Configuration loading and validation

use crate::config::Config;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads configuration from an optional TOML file
///
/// When `path` is `None`, the built-in defaults are used. A present but
/// unreadable or malformed file is an error; a missing field falls back
/// to its default.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let config = match path {
        Some(p) => {
            let contents = std::fs::read_to_string(p)?;
            toml::from_str(&contents)?
        }
        None => Config::default(),
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validates configuration values
fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.http.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be greater than 0".to_string(),
        ));
    }

    // A zero start would make the doubling 429 retry loop spin without
    // ever sleeping.
    if config.http.backoff_start_secs == 0 {
        return Err(ConfigError::Validation(
            "backoff-start-secs must be greater than 0".to_string(),
        ));
    }

    if config.http.backoff_cap_secs < config.http.backoff_start_secs {
        return Err(ConfigError::Validation(format!(
            "backoff-cap-secs ({}) must not be less than backoff-start-secs ({})",
            config.http.backoff_cap_secs, config.http.backoff_start_secs
        )));
    }

    if config.http.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent must not be empty".to_string(),
        ));
    }

    for ext in &config.skip_extensions {
        if !ext.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "skip-extensions entries must start with a dot, got: {}",
                ext
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.http.request_timeout_secs, 10);
        assert_eq!(config.http.backoff_start_secs, 1);
        assert_eq!(config.http.backoff_cap_secs, 60);
        assert!(config.skip_extensions.contains(&".pdf".to_string()));
        assert!(config.skip_extensions.contains(&".webm".to_string()));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nrequest-timeout-secs = 5").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.http.request_timeout_secs, 5);
        assert_eq!(config.http.backoff_cap_secs, 60);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nrequest-timeout-secs = 0").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_backoff_start_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nbackoff-start-secs = 0").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_backoff_cap_below_start_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nbackoff-start-secs = 30\nbackoff-cap-secs = 5").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_extension_without_dot_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "skip-extensions = [\"pdf\"]").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/pixelsweep.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [[").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
