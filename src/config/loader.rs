//! Configuration loading from disk and the environment.

use secrecy::SecretString;
use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, UpstreamConfig, ValidationError};

/// Environment variable holding the provider base URL.
pub const ENV_ENDPOINT: &str = "AZURE_ENDPOINT";
/// Environment variable holding the subscription key.
pub const ENV_KEY: &str = "AZURE_KEY";
/// Environment variable holding the listening port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid {name} value '{value}'")]
    Env { name: &'static str, value: String },
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then the process environment on top.
///
/// Returns the full config together with the validated upstream settings.
pub fn load_config(path: Option<&Path>) -> Result<(ProxyConfig, UpstreamConfig), ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    let config = apply_env(config, |name| std::env::var(name).ok())?;
    let upstream = validate_config(&config).map_err(ConfigError::Validation)?;

    Ok((config, upstream))
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts the environment so tests can inject their own values.
/// Empty variables count as unset.
pub fn apply_env<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(endpoint) = get(ENV_ENDPOINT) {
        config.upstream.endpoint = Some(endpoint);
    }
    if let Some(key) = get(ENV_KEY) {
        config.upstream.key = Some(SecretString::from(key));
    }
    if let Some(port) = get(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_PORT,
            value: port,
        })?;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ProxyConfig = toml::from_str(
            r#"
            [listener]
            port = 8080

            [upstream]
            endpoint = "https://file.example.com"
            request_timeout_secs = 5
            "#,
        )
        .unwrap();

        let config = apply_env(
            file,
            env(&[
                (ENV_ENDPOINT, "https://env.example.com"),
                (ENV_KEY, "secret"),
                (ENV_PORT, "4000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.upstream.endpoint.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.upstream.key.unwrap().expose_secret(), "secret");
        assert_eq!(config.upstream.request_timeout_secs, 5);
        assert_eq!(config.listener.port, 4000);
    }

    #[test]
    fn test_default_port() {
        let config = apply_env(ProxyConfig::default(), env(&[])).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert!(config.upstream.endpoint.is_none());
    }

    #[test]
    fn test_empty_env_is_unset() {
        let config = apply_env(ProxyConfig::default(), env(&[(ENV_KEY, "")])).unwrap();
        assert!(config.upstream.key.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = apply_env(ProxyConfig::default(), env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: ENV_PORT, .. }));
    }

    #[test]
    fn test_validation_message_lists_everything() {
        let err = ConfigError::Validation(vec![
            ValidationError::MissingEndpoint,
            ValidationError::MissingKey,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: AZURE_ENDPOINT is not set, AZURE_KEY is not set"
        );
    }
}
