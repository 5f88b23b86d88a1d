//! Configuration loading: TOML embedded in the binary with browser storage
//! overrides.
//!
//! Every field has a sensible default so the embedded file may be empty.
//! Values stored under the `gatewayUi.*` storage keys take precedence over
//! file values, the same way environment variables would for a daemon.

use std::time::Duration;

use serde::Deserialize;

use crate::ports::Storage;

/// Storage key overriding [`ApiConfig::timeout_ms`].
pub const TIMEOUT_KEY: &str = "gatewayUi.timeoutMs";
/// Storage key overriding [`PollingConfig::interval_ms`].
pub const POLL_INTERVAL_KEY: &str = "gatewayUi.pollIntervalMs";
/// Storage key overriding [`LoggingConfig::filter`].
pub const LOG_FILTER_KEY: &str = "gatewayUi.logFilter";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gateway REST API settings.
    pub api: ApiConfig,
    /// Auto-refresh settings.
    pub polling: PollingConfig,
    /// Router settings.
    pub navigation: NavigationConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Local development settings.
    pub development: DevelopmentConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path of the API below the gateway address.
    pub base_path: String,
    /// Default request timeout in milliseconds.
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between the end of one refresh and the start of the next.
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Page shown when the location has no hash.
    pub default_page: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// When the UI is served by a development server instead of the gateway,
/// the gateway address is asked once and cached.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DevelopmentConfig {
    /// Host names treated as development servers.
    pub hosts: Vec<String>,
    /// Storage key of the cached gateway address.
    pub address_key: String,
}

impl Config {
    /// Parse `content`, apply storage overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn load(content: &str, storage: &impl Storage) -> Result<Self, ConfigError> {
        let mut config = Self::from_toml(content)?;
        config.apply_storage_overrides(storage);
        config.validate()?;
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    fn apply_storage_overrides(&mut self, storage: &impl Storage) {
        if let Some(timeout) = storage
            .get_item(TIMEOUT_KEY)
            .and_then(|val| val.trim().parse().ok())
        {
            self.api.timeout_ms = timeout;
        }
        if let Some(interval) = storage
            .get_item(POLL_INTERVAL_KEY)
            .and_then(|val| val.trim().parse().ok())
        {
            self.polling.interval_ms = interval;
        }
        if let Some(filter) = storage.get_item(LOG_FILTER_KEY) {
            self.logging.filter = filter;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "api timeout must be non-zero".to_string(),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "polling interval must be non-zero".to_string(),
            ));
        }
        if self.navigation.default_page.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default page must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    /// Whether `hostname` is one of the development hosts.
    #[must_use]
    pub fn is_development_host(&self, hostname: &str) -> bool {
        self.development.hosts.iter().any(|host| host == hostname)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: "/api".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_page: "status".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["127.0.0.1".to_string(), "localhost".to_string()],
            address_key: "gatewayAddress".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
