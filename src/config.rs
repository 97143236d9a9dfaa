//! Configuration module for loading and parsing TOML configuration files.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Browser user agent sent to the public quote provider.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Primary options-chain provider.
    pub primary: PrimaryProviderConfig,
    /// Secondary quote provider.
    pub quotes: QuoteProviderConfig,
    /// Response cache.
    pub cache: CacheConfig,
    /// Per-query default symbols.
    pub defaults: DefaultsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Primary options-chain provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrimaryProviderConfig {
    /// Base URL of the snapshot API.
    pub base_url: String,
    /// Bearer token. Empty means the provider is unavailable.
    pub api_key: String,
    /// Request deadline in milliseconds.
    pub timeout_ms: u64,
    /// Minimum spacing between two provider calls in milliseconds.
    pub min_interval_ms: u64,
    /// Result-count limit sent with every request.
    pub limit: u32,
}

impl Default for PrimaryProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.polygon.io".to_string(),
            api_key: String::new(),
            timeout_ms: 8_000,
            min_interval_ms: 200,
            limit: 250,
        }
    }
}

impl PrimaryProviderConfig {
    /// Request deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Minimum spacing between calls.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Returns the API key if one is configured.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

/// Secondary quote provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteProviderConfig {
    /// Base URL of the quote/chart API.
    pub base_url: String,
    /// Request deadline in milliseconds.
    pub timeout_ms: u64,
    /// User agent header value.
    pub user_agent: String,
}

impl Default for QuoteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_ms: 6_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl QuoteProviderConfig {
    /// Request deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds.
    pub ttl_secs: u64,
    /// Entry count above which housekeeping runs.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30,
            max_entries: 100,
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Default symbols used when a request omits them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Single-symbol default (`chain`, `sparkline`).
    pub symbol: String,
    /// Zero-DTE scan universe.
    pub zero_dte_symbols: Vec<String>,
    /// Unusual-activity scan universe.
    pub unusual_symbols: Vec<String>,
    /// Quote snapshot universe.
    pub snapshot_symbols: Vec<String>,
    /// Benchmark used for the put/call ratio.
    pub pcr_symbol: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let owned = |symbols: &[&str]| symbols.iter().map(|s| s.to_string()).collect();
        Self {
            symbol: "SPY".to_string(),
            zero_dte_symbols: owned(&["SPY", "QQQ", "IWM"]),
            unusual_symbols: owned(&["SPY", "QQQ", "AAPL", "TSLA", "NVDA"]),
            snapshot_symbols: owned(&["SPY", "QQQ", "IWM", "DIA"]),
            pcr_symbol: "SPY".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `HOST`, `PORT` and `POLYGON_API_KEY` environment overrides.
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port number.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a number: {port}")))?;
        }
        if let Ok(key) = std::env::var("POLYGON_API_KEY") {
            self.primary.api_key = key;
        }
        Ok(self)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.primary.base_url.is_empty() || self.quotes.base_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "provider base_url cannot be empty".to_string(),
            ));
        }
        if self.primary.timeout_ms == 0 || self.quotes.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "provider timeout_ms must be positive".to_string(),
            ));
        }
        if self.primary.limit == 0 {
            return Err(ConfigError::InvalidValue(
                "primary limit must be positive".to_string(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "cache ttl_secs must be positive".to_string(),
            ));
        }
        if self.defaults.symbol.is_empty() || self.defaults.pcr_symbol.is_empty() {
            return Err(ConfigError::InvalidValue(
                "default symbols cannot be empty".to_string(),
            ));
        }
        for (name, list) in [
            ("zero_dte_symbols", &self.defaults.zero_dte_symbols),
            ("unusual_symbols", &self.defaults.unusual_symbols),
            ("snapshot_symbols", &self.defaults.snapshot_symbols),
        ] {
            if list.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "defaults.{name} must list at least one symbol"
                )));
            }
        }
        Ok(())
    }
}
