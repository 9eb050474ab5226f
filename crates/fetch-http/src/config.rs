//! File and environment configuration for [`Options`].

use crate::options::{Options, DEFAULT_TIMEOUT};
use crate::request::SharedHeaders;
use reqwest::header::{HeaderName, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    Parse { line: Option<usize>, message: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },
}

/// Environment variable names.
pub mod vars {
    pub const FETCH_TIMEOUT_MS: &str = "FETCH_TIMEOUT_MS";
    pub const FETCH_HOST: &str = "FETCH_HOST";
    pub const FETCH_USER_AGENT: &str = "FETCH_USER_AGENT";
}

/// Serializable client configuration.
///
/// ```yaml
/// timeout_ms: 5000
/// host: api.example.com
/// headers:
///   Accept: [application/json]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Header name to values.
    pub headers: BTreeMap<String, Vec<String>>,
    /// Timeout in milliseconds. Zero means the default.
    pub timeout_ms: u64,
    pub host: Option<String>,
}

impl FetchConfig {
    /// Parse YAML.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Load a YAML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Overlay `FETCH_*` environment variables onto this config.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(vars::FETCH_TIMEOUT_MS) {
            self.timeout_ms = value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                var: vars::FETCH_TIMEOUT_MS.to_string(),
                message: e.to_string(),
            })?;
        }

        if let Ok(host) = std::env::var(vars::FETCH_HOST) {
            self.host = Some(host);
        }

        if let Ok(agent) = std::env::var(vars::FETCH_USER_AGENT) {
            self.headers.insert(USER_AGENT.as_str().to_string(), vec![agent]);
        }

        Ok(self)
    }

    /// Configured timeout with zero mapped to [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            0 => DEFAULT_TIMEOUT,
            ms => Duration::from_millis(ms),
        }
    }

    /// Validate headers and build [`Options`].
    pub fn into_options(self) -> Result<Options, ConfigError> {
        let headers = SharedHeaders::new();

        for (name, values) in &self.headers {
            let header = HeaderName::try_from(name.as_str()).map_err(|e| {
                ConfigError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                }
            })?;

            for value in values {
                let value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                    ConfigError::InvalidHeader {
                        name: name.clone(),
                        message: e.to_string(),
                    }
                })?;
                headers.append(header.clone(), value);
            }
        }

        Ok(Options {
            headers,
            timeout: self.timeout(),
            host: self.host,
            transport: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT;
    use std::env;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = FetchConfig::from_yaml_str("host: api.example.com\n").unwrap();

        assert_eq!(config.host.as_deref(), Some("api.example.com"));
        assert_eq!(config.timeout_ms, 0);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_yaml_into_options() {
        let yaml = r#"
timeout_ms: 1500
headers:
  Accept: [application/json, text/plain]
  X-Team: [core]
"#;
        let options = FetchConfig::from_yaml_str(yaml).unwrap().into_options().unwrap();

        assert_eq!(options.timeout, Duration::from_millis(1500));
        let headers = options.headers.snapshot();
        assert_eq!(headers.get_all(ACCEPT).iter().count(), 2);
        assert_eq!(headers.get("x-team").unwrap(), "core");
    }

    #[test]
    fn test_invalid_yaml_reports_line() {
        let err = FetchConfig::from_yaml_str("timeout_ms: [1, 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid YAML"));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut config = FetchConfig::default();
        config
            .headers
            .insert("bad header".to_string(), vec!["v".to_string()]);

        let err = config.into_options().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = FetchConfig::load(dir.path().join("fetch.yaml")).unwrap();
        assert_eq!(config, FetchConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetch.yaml");
        std::fs::write(&path, "timeout_ms: 10\n").unwrap();

        let config = FetchConfig::load(&path).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(10));
    }

    // Only test in this crate that touches the process environment.
    #[test]
    fn test_apply_env() {
        let saved: Vec<_> = [vars::FETCH_TIMEOUT_MS, vars::FETCH_HOST, vars::FETCH_USER_AGENT]
            .iter()
            .map(|k| (*k, env::var(k).ok()))
            .collect();

        env::set_var(vars::FETCH_TIMEOUT_MS, "250");
        env::set_var(vars::FETCH_HOST, "env.example.com");
        env::set_var(vars::FETCH_USER_AGENT, "fetch-env");
        let config = FetchConfig::from_env().unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.host.as_deref(), Some("env.example.com"));
        assert_eq!(config.headers["user-agent"], vec!["fetch-env".to_string()]);

        env::set_var(vars::FETCH_TIMEOUT_MS, "soon");
        let err = FetchConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
