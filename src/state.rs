//! Application state management.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::ProviderError;
use crate::providers::{PolygonClient, ResponseCache, YahooClient};
use crate::rate_limiter::RateLimiter;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across all handlers.
///
/// Built once at startup; the cache and the rate limiter are the only
/// mutable process-wide state and both are safe to share across threads.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Response cache shared by both providers.
    pub cache: Arc<ResponseCache>,
    /// Gate in front of the primary provider.
    pub limiter: Arc<RateLimiter>,
    /// Primary options-chain provider.
    pub options: PolygonClient,
    /// Secondary quote provider.
    pub quotes: YahooClient,
}

impl AppState {
    /// Creates the application state from configuration.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self, ProviderError> {
        let cache = Arc::new(TtlCache::new(config.cache.ttl(), config.cache.max_entries));
        let limiter = Arc::new(RateLimiter::new(config.primary.min_interval()));

        let options = PolygonClient::new(&config.primary, Arc::clone(&cache), Arc::clone(&limiter))?;
        let quotes = YahooClient::new(&config.quotes, Arc::clone(&cache))?;

        if options.is_configured() {
            info!(base_url = %config.primary.base_url, "options provider configured");
        } else {
            warn!("no options provider credential configured, chains will be synthetic");
        }

        Ok(Self {
            config: Arc::new(config),
            cache,
            limiter,
            options,
            quotes,
        })
    }

    /// Calendar date used for same-day and lower-bound expiration filters.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Result limit for primary provider requests.
    #[must_use]
    pub fn request_limit(&self) -> u32 {
        self.config.primary.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let state = AppState::from_config(Config::default()).expect("state should build");
        assert!(!state.options.is_configured());
        assert!(state.cache.is_empty());
        assert_eq!(state.request_limit(), 250);
        assert_eq!(state.limiter.min_interval().as_millis(), 200);
        assert_eq!(state.cache.ttl().as_secs(), 30);
    }

    #[test]
    fn test_from_config_with_credential() {
        let mut config = Config::default();
        config.primary.api_key = "abc".to_string();
        let state = AppState::from_config(config).expect("state should build");
        assert!(state.options.is_configured());
    }
}
