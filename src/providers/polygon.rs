//! Primary options-chain provider client.
//!
//! Talks to a Polygon-style `/v3/snapshot/options/{underlying}` endpoint.
//! Every network call passes through the shared [`RateLimiter`] and
//! successful results land in the shared response cache.

use crate::config::PrimaryProviderConfig;
use crate::error::ProviderError;
use crate::providers::{CachedPayload, ResponseCache, endpoint, truncate_body};
use crate::rate_limiter::RateLimiter;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Expiration constraint of an options request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationFilter {
    /// Exactly this expiration.
    On(NaiveDate),
    /// This expiration or later.
    OnOrAfter(NaiveDate),
}

/// Filters sent with an options snapshot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsFilter {
    /// Expiration constraint.
    pub expiration: ExpirationFilter,
    /// Maximum number of records.
    pub limit: u32,
}

impl OptionsFilter {
    /// Contracts expiring on `date`.
    #[must_use]
    pub fn expiring_on(date: NaiveDate, limit: u32) -> Self {
        Self {
            expiration: ExpirationFilter::On(date),
            limit,
        }
    }

    /// Contracts expiring on or after `date`.
    #[must_use]
    pub fn expiring_from(date: NaiveDate, limit: u32) -> Self {
        Self {
            expiration: ExpirationFilter::OnOrAfter(date),
            limit,
        }
    }

    /// Cache key for `symbol` under this filter.
    #[must_use]
    pub fn cache_key(&self, symbol: &str) -> String {
        match self.expiration {
            ExpirationFilter::On(date) => {
                format!("polygon:{symbol}:exp={date}:limit={}", self.limit)
            }
            ExpirationFilter::OnOrAfter(date) => {
                format!("polygon:{symbol}:exp>={date}:limit={}", self.limit)
            }
        }
    }

    /// URL-encoded query string.
    #[must_use]
    pub fn query_string(&self) -> String {
        let (name, date) = match self.expiration {
            ExpirationFilter::On(date) => ("expiration_date", date),
            ExpirationFilter::OnOrAfter(date) => ("expiration_date.gte", date),
        };
        let params = [
            (name, date.to_string()),
            ("limit", self.limit.to_string()),
        ];
        serde_urlencoded::to_string(params).unwrap_or_default()
    }
}

/// One option record as returned by the snapshot endpoint.
///
/// Every field is optional; see [`crate::providers::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOptionRecord {
    /// Static contract details.
    pub details: Option<RawDetails>,
    /// Session aggregates.
    pub day: Option<RawDay>,
    /// Most recent trade.
    pub last_trade: Option<RawLastTrade>,
    /// Open interest.
    pub open_interest: Option<f64>,
    /// Implied volatility.
    pub implied_volatility: Option<f64>,
    /// Greeks.
    pub greeks: Option<RawGreeks>,
}

/// Contract details of a raw record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDetails {
    /// `"call"` or `"put"`.
    pub contract_type: Option<String>,
    /// `YYYY-MM-DD`.
    pub expiration_date: Option<String>,
    /// Strike price.
    pub strike_price: Option<f64>,
    /// Provider instrument identifier.
    pub ticker: Option<String>,
}

/// Session aggregates of a raw record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDay {
    /// Close (last) price.
    pub close: Option<f64>,
    /// Price change.
    pub change: Option<f64>,
    /// Price change percent.
    pub change_percent: Option<f64>,
    /// Volume.
    pub volume: Option<f64>,
    /// Volume-weighted average price.
    pub vwap: Option<f64>,
    /// High.
    pub high: Option<f64>,
    /// Low.
    pub low: Option<f64>,
}

/// Last trade of a raw record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLastTrade {
    /// Trade price.
    pub price: Option<f64>,
}

/// Greeks of a raw record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGreeks {
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotResponse {
    results: Option<Vec<RawOptionRecord>>,
}

/// Client for the primary options-chain provider.
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
}

impl PolygonClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        config: &PrimaryProviderConfig,
        cache: Arc<ResponseCache>,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.credential().map(str::to_string),
            cache,
            limiter,
        })
    }

    /// Whether a credential is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches option snapshot records for `symbol`.
    ///
    /// Served from cache when fresh. An empty `Ok` means the provider
    /// answered with no records.
    ///
    /// # Errors
    /// Returns [`ProviderError`] on missing credential, transport failure,
    /// timeout, non-success status or undecodable body. Failures are logged
    /// here.
    pub async fn fetch_options(
        &self,
        symbol: &str,
        filter: &OptionsFilter,
    ) -> Result<Arc<Vec<RawOptionRecord>>, ProviderError> {
        let key = filter.cache_key(symbol);
        if let Some(CachedPayload::Options(records)) = self.cache.get(&key) {
            return Ok(records);
        }

        let records = match self.request(symbol, filter).await {
            Ok(records) => Arc::new(records),
            Err(err) => {
                warn!(symbol, error = %err, "options provider request failed");
                return Err(err);
            }
        };

        debug!(symbol, count = records.len(), "options provider returned records");
        self.cache
            .set(key, CachedPayload::Options(Arc::clone(&records)));
        Ok(records)
    }

    async fn request(
        &self,
        symbol: &str,
        filter: &OptionsFilter,
    ) -> Result<Vec<RawOptionRecord>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;

        let url = endpoint(
            &self.base_url,
            &["v3", "snapshot", "options", symbol],
            Some(&filter.query_string()),
        )?;

        self.limiter.acquire().await;
        let resp = self.client.get(url).bearer_auth(api_key).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: SnapshotResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(parsed.results.unwrap_or_default())
    }
}
