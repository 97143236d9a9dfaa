//! HTTP client for the options flow API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Options Flow API.
#[derive(Debug, Clone)]
pub struct OptionsFlowClient {
    client: Client,
    base_url: String,
}

impl OptionsFlowClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Options
    // ========================================================================

    /// Gets the option chain for `symbol` (server default when `None`).
    ///
    /// # Errors
    /// Returns error if the request fails or `symbol` is blank.
    pub async fn get_chain(
        &self,
        symbol: Option<&str>,
        exp_date: Option<&str>,
    ) -> Result<ChainResponse, Error> {
        let mut query = OptionsQuery::new(QueryKind::Chain);
        query.symbol = symbol.map(non_blank).transpose()?;
        query.exp_date = exp_date.map(str::to_string);
        self.get_options(&query).await
    }

    /// Gets same-day contracts across `symbols` (server defaults when empty).
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_zero_dte(&self, symbols: &[&str]) -> Result<ZeroDteResponse, Error> {
        let mut query = OptionsQuery::new(QueryKind::ZeroDte);
        query.symbols = join_symbols(symbols);
        self.get_options(&query).await
    }

    /// Gets unusual-activity contracts across `symbols`.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_unusual_activity(
        &self,
        symbols: &[&str],
    ) -> Result<UnusualActivityResponse, Error> {
        let mut query = OptionsQuery::new(QueryKind::Unusual);
        query.symbols = join_symbols(symbols);
        self.get_options(&query).await
    }

    /// Gets equity quotes for `symbols`.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_snapshot(&self, symbols: &[&str]) -> Result<SnapshotResponse, Error> {
        let mut query = OptionsQuery::new(QueryKind::Snapshot);
        query.symbols = join_symbols(symbols);
        self.get_options(&query).await
    }

    /// Gets the intraday close series for `symbol`.
    ///
    /// # Errors
    /// Returns error if the request fails or `symbol` is blank.
    pub async fn get_sparkline(&self, symbol: &str) -> Result<SparklineResponse, Error> {
        let mut query = OptionsQuery::new(QueryKind::Sparkline);
        query.symbol = Some(non_blank(symbol)?);
        self.get_options(&query).await
    }

    /// Gets the market-wide put/call volume ratio.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_put_call_ratio(&self) -> Result<PutCallRatioResponse, Error> {
        self.get_options(&OptionsQuery::new(QueryKind::PutCallRatio))
            .await
    }

    /// Sends an arbitrary `/api/options` query.
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode as `T`.
    pub async fn get_options<T: DeserializeOwned>(&self, query: &OptionsQuery) -> Result<T, Error> {
        let params =
            serde_urlencoded::to_string(query).map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let url = format!("{}/api/options?{}", self.base_url, params);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&text)?)
        } else {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn non_blank(symbol: &str) -> Result<String, Error> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidRequest("symbol must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn join_symbols(symbols: &[&str]) -> Option<String> {
    let joined = symbols
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}
