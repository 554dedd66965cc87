//! [`ClientConfig`]: defaults, YAML or JSON file, `PAYDASH_*` environment
//! overrides and validation.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while resolving a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The YAML file did not match [`ClientConfig`].
    #[error("failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// The JSON file did not match [`ClientConfig`].
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither YAML nor JSON.
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,
    /// A setting failed to parse or validate.
    #[error("Invalid {name} value: {reason}")]
    InvalidValue {
        /// Setting or environment variable at fault.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Output format of the log subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging settings consumed by the CLI's tracing subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`trace`..`error`) when `RUST_LOG` is unset.
    pub level: String,
    /// Text or JSON output.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// The main configuration structure for the `PayDash` client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST backend; endpoints are joined onto it.
    pub api_base_url: Url,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// File holding the persisted token and cached profile.
    pub storage_path: PathBuf,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never; the default base URL is a valid constant.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: default_storage_path(),
            logging: LoggingConfig::default(),
        }
    }

    /// Loads the configuration from a file, the process environment, or
    /// defaults.
    ///
    /// Precedence, lowest first: defaults, `PAYDASH_*` environment variables
    /// (only where the file left the default in place), the file, then
    /// `base_url_override`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, if an
    /// environment variable holds an invalid value, or if validation fails.
    pub fn load_config(
        config_path: Option<PathBuf>,
        base_url_override: Option<Url>,
    ) -> Result<Self, ConfigError> {
        Self::load_config_with_env(config_path, base_url_override, |name| env::var(name).ok())
    }

    /// [`Self::load_config`] reading `PAYDASH_*` variables through `lookup`
    /// instead of the process environment.
    ///
    /// # Errors
    /// Same as [`Self::load_config`].
    pub fn load_config_with_env<F>(
        config_path: Option<PathBuf>,
        base_url_override: Option<Url>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::with_defaults();
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => defaults.clone(),
        };

        if config.api_base_url == defaults.api_base_url
            && let Some(value) = lookup("PAYDASH_API_BASE_URL")
        {
            config.api_base_url = Url::parse(&value).map_err(|err| ConfigError::InvalidValue {
                name: "PAYDASH_API_BASE_URL",
                reason: err.to_string(),
            })?;
        }
        if config.request_timeout_secs == defaults.request_timeout_secs
            && let Some(value) = lookup("PAYDASH_REQUEST_TIMEOUT_SECS")
        {
            config.request_timeout_secs = value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PAYDASH_REQUEST_TIMEOUT_SECS",
                reason: "must be a whole number of seconds".to_string(),
            })?;
        }
        if config.storage_path == defaults.storage_path
            && let Some(value) = lookup("PAYDASH_STORAGE_PATH")
        {
            config.storage_path = PathBuf::from(value);
        }
        if config.logging.level == defaults.logging.level
            && let Some(value) = lookup("PAYDASH_LOG_LEVEL")
        {
            config.logging.level = value;
        }
        if config.logging.format == defaults.logging.format
            && let Some(value) = lookup("PAYDASH_LOG_FORMAT")
        {
            config.logging.format = match value.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "PAYDASH_LOG_FORMAT",
                        reason: "must be 'text' or 'json'".to_string(),
                    });
                }
            };
        }

        if let Some(url) = base_url_override {
            config.api_base_url = url;
        }

        config.api_base_url = normalize_base_url(config.api_base_url);

        if let Err(errors) = config.validate() {
            return Err(ConfigError::InvalidValue {
                name: "configuration",
                reason: errors.join("; "),
            });
        }

        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        if !matches!(extension.as_deref(), Some("yaml" | "yml" | "json")) {
            return Err(ConfigError::UnsupportedFormat);
        }

        let content =
            fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
        let config = if extension.as_deref() == Some("json") {
            serde_json::from_str(&content)?
        } else {
            serde_yml::from_str(&content)?
        };
        Ok(config)
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration, collecting every problem found.
    ///
    /// # Errors
    /// Returns the list of validation messages when any check fails.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            errors.push(format!(
                "API base URL must use http or https: {}",
                self.api_base_url
            ));
        }
        if self.request_timeout_secs == 0 {
            errors.push("Invalid request timeout. Must be greater than 0.".to_string());
        }
        if self.storage_path.as_os_str().is_empty() {
            errors.push("Storage path must not be empty.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Default location of the session file, under the user's config directory.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("paydash").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./paydash-session.json"))
}

// `Url::join` drops the last path segment unless the base ends with '/'.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn load(
        config_path: Option<PathBuf>,
        base_url_override: Option<Url>,
        vars: &[(&str, &str)],
    ) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        ClientConfig::load_config_with_env(config_path, base_url_override, |name| {
            vars.get(name).cloned()
        })
    }

    #[test]
    fn test_config_with_defaults() {
        let config = ClientConfig::with_defaults();

        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.storage_path.ends_with("session.json"));
    }

    #[test]
    fn test_load_config_without_sources_yields_defaults() {
        let config = load(None, None, &[]).unwrap();
        assert_eq!(config, ClientConfig::with_defaults());
    }

    #[test]
    fn test_load_config_with_base_url_override() {
        let url = Url::parse("https://api.example.com/v1").unwrap();
        let config = load(
            None,
            Some(url),
            &[("PAYDASH_API_BASE_URL", "https://env.example.com/api/")],
        )
        .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn test_load_config_with_environment_variables() {
        let config = load(
            None,
            None,
            &[
                ("PAYDASH_API_BASE_URL", "https://env.example.com/api/"),
                ("PAYDASH_REQUEST_TIMEOUT_SECS", "5"),
                ("PAYDASH_STORAGE_PATH", "/tmp/paydash-env.json"),
                ("PAYDASH_LOG_LEVEL", "debug"),
                ("PAYDASH_LOG_FORMAT", "JSON"),
            ],
        )
        .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://env.example.com/api/");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/paydash-env.json"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_timeout_environment() {
        let err = load(None, None, &[("PAYDASH_REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("PAYDASH_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_log_format_environment() {
        let err = load(None, None, &[("PAYDASH_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("PAYDASH_LOG_FORMAT"));
    }

    #[test]
    fn test_load_config_from_yaml_file() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let config_file = temp_dir.path().join("paydash.yaml");
        fs::write(
            &config_file,
            r#"
api_base_url: "https://yaml.example.com/api"
request_timeout_secs: 12
storage_path: "/yaml/session.json"
logging:
  level: "info"
  format: "json"
"#,
        )?;

        let config = load(Some(config_file), None, &[])?;

        assert_eq!(config.api_base_url.as_str(), "https://yaml.example.com/api/");
        assert_eq!(config.request_timeout_secs, 12);
        assert_eq!(config.storage_path, PathBuf::from("/yaml/session.json"));
        assert_eq!(config.logging.format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn test_partial_json_file_keeps_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let config_file = temp_dir.path().join("paydash.json");
        fs::write(&config_file, r#"{ "request_timeout_secs": 3 }"#)?;

        let config = load(Some(config_file), None, &[])?;

        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.logging, LoggingConfig::default());
        Ok(())
    }

    #[test]
    fn test_file_values_take_precedence_over_environment() -> Result<(), Box<dyn std::error::Error>>
    {
        let temp_dir = TempDir::new()?;
        let config_file = temp_dir.path().join("paydash.json");
        fs::write(
            &config_file,
            r#"{ "api_base_url": "https://file.example.com/", "request_timeout_secs": 9 }"#,
        )?;

        let config = load(
            Some(config_file),
            None,
            &[
                ("PAYDASH_API_BASE_URL", "https://env.example.com/"),
                ("PAYDASH_REQUEST_TIMEOUT_SECS", "4"),
                ("PAYDASH_LOG_LEVEL", "trace"),
            ],
        )?;

        assert_eq!(config.api_base_url.as_str(), "https://file.example.com/");
        assert_eq!(config.request_timeout_secs, 9);
        assert_eq!(config.logging.level, "trace");
        Ok(())
    }

    #[test]
    fn test_load_config_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("paydash.toml");
        fs::write(&config_file, "request_timeout_secs = 6").unwrap();

        let err = load(Some(config_file), None, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat));
    }

    #[test]
    fn test_load_config_nonexistent_file() {
        let err = load(Some(PathBuf::from("/nonexistent/paydash.yaml")), None, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("paydash.json");
        fs::write(&config_file, r#"{ "request_timeout_secs": 0 }"#).unwrap();

        let err = load(Some(config_file), None, &[]).unwrap_err();
        assert!(err.to_string().contains("Invalid request timeout"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let mut config = ClientConfig::with_defaults();
        config.api_base_url = Url::parse("ftp://files.example.com/").unwrap();

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("http or https")));
    }

    #[test]
    fn test_normalize_base_url_is_idempotent() {
        let url = Url::parse("https://api.example.com/v1/").unwrap();
        assert_eq!(normalize_base_url(url.clone()), url);
    }
}
