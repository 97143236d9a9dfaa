//! Secondary quote provider client.
//!
//! Uses Yahoo Finance's public quote and chart endpoints. No key is
//! required, but a browser user agent is. Failures never surface as errors:
//! callers get an empty map or `None` and treat it as "no data".

use crate::config::QuoteProviderConfig;
use crate::error::ProviderError;
use crate::models::{QuoteSummary, SparklineSeries};
use crate::providers::{CachedPayload, ResponseCache, endpoint, truncate_body};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for the secondary quote provider.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
    cache: Arc<ResponseCache>,
}

impl YahooClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        config: &QuoteProviderConfig,
        cache: Arc<ResponseCache>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Fetches quote summaries for `symbols`.
    ///
    /// Symbols the provider does not know are simply absent from the map.
    pub async fn fetch_quotes(&self, symbols: &[String]) -> HashMap<String, QuoteSummary> {
        if symbols.is_empty() {
            return HashMap::new();
        }

        let joined = symbols.join(",");
        let key = format!("yahoo:quotes:{joined}");
        if let Some(CachedPayload::Quotes(quotes)) = self.cache.get(&key) {
            return quotes;
        }

        let query = serde_urlencoded::to_string([("symbols", joined.as_str())]).unwrap_or_default();
        match self
            .get_json::<QuoteEnvelope>(&["v7", "finance", "quote"], &query)
            .await
        {
            Ok(envelope) => {
                let quotes = envelope.into_summaries();
                if !quotes.is_empty() {
                    self.cache.set(key, CachedPayload::Quotes(quotes.clone()));
                }
                quotes
            }
            Err(err) => {
                warn!(symbols = %joined, error = %err, "quote provider request failed");
                HashMap::new()
            }
        }
    }

    /// Current price of `symbol`, if the provider has one.
    pub async fn live_price(&self, symbol: &str) -> Option<f64> {
        let quotes = self.fetch_quotes(&[symbol.to_string()]).await;
        quotes
            .get(symbol)
            .map(|q| q.price)
            .filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Fetches today's intraday close series for `symbol`.
    pub async fn fetch_intraday_series(&self, symbol: &str) -> Option<SparklineSeries> {
        let key = format!("yahoo:spark:{symbol}");
        if let Some(CachedPayload::Spark(series)) = self.cache.get(&key) {
            return Some(series);
        }

        match self
            .get_json::<ChartEnvelope>(&["v8", "finance", "chart", symbol], "interval=5m&range=1d")
            .await
        {
            Ok(envelope) => {
                let series = envelope.into_series()?;
                self.cache.set(key, CachedPayload::Spark(series.clone()));
                Some(series)
            }
            Err(err) => {
                warn!(symbol, error = %err, "chart provider request failed");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &str,
    ) -> Result<T, ProviderError> {
        let url = endpoint(&self.base_url, segments, Some(query))?;
        debug!(url = %url, "quote provider request");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

// Yahoo Finance API response structures

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QuoteEnvelope {
    quote_response: QuoteResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteResult {
    result: Option<Vec<QuoteData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QuoteData {
    symbol: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_change: Option<f64>,
    regular_market_change_percent: Option<f64>,
    regular_market_volume: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
}

impl QuoteEnvelope {
    fn into_summaries(self) -> HashMap<String, QuoteSummary> {
        self.quote_response
            .result
            .unwrap_or_default()
            .into_iter()
            .filter_map(|q| {
                let symbol = q.symbol?.to_uppercase();
                let summary = QuoteSummary {
                    price: q.regular_market_price.unwrap_or(0.0),
                    change: q.regular_market_change.unwrap_or(0.0),
                    change_percent: q.regular_market_change_percent.unwrap_or(0.0),
                    volume: q
                        .regular_market_volume
                        .filter(|v| v.is_finite() && *v > 0.0)
                        .map_or(0, |v| v as u64),
                    company_name: q.long_name.or(q.short_name).unwrap_or_else(|| symbol.clone()),
                    day_high: q.regular_market_day_high.unwrap_or(0.0),
                    day_low: q.regular_market_day_low.unwrap_or(0.0),
                };
                Some((symbol, summary))
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartEnvelope {
    chart: ChartResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartQuote {
    close: Vec<Option<f64>>,
}

impl ChartEnvelope {
    /// Pairs timestamps with closes, dropping null points.
    fn into_series(self) -> Option<SparklineSeries> {
        let data = self.chart.result?.into_iter().next()?;
        let timestamps = data.timestamp?;
        let closes = data.indicators.quote.into_iter().next()?.close;

        let (timestamps, closes): (Vec<i64>, Vec<f64>) = timestamps
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| close.filter(|c| c.is_finite()).map(|c| (ts, c)))
            .unzip();

        (!timestamps.is_empty()).then_some(SparklineSeries { timestamps, closes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlCache;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::time::Duration;
    use tokio::net::TcpListener;

    const QUOTES: &str = r#"{"quoteResponse":{"result":[
        {"symbol":"SPY","regularMarketPrice":581.2,"regularMarketChange":1.5,"regularMarketChangePercent":0.26,
         "regularMarketVolume":51234567,"longName":"SPDR S&P 500 ETF Trust","regularMarketDayHigh":583.0,"regularMarketDayLow":578.9},
        {"symbol":"QQQ","regularMarketPrice":501.0,"shortName":"Invesco QQQ"}
    ],"error":null}}"#;

    const CHART: &str = r#"{"chart":{"result":[{"timestamp":[1000,1300,1600],
        "indicators":{"quote":[{"close":[580.1,null,581.4]}]}}],"error":null}}"#;

    fn cache() -> Arc<ResponseCache> {
        Arc::new(TtlCache::new(Duration::from_secs(30), 100))
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str, cache: Arc<ResponseCache>) -> YahooClient {
        let config = QuoteProviderConfig {
            base_url: base_url.to_string(),
            timeout_ms: 2_000,
            ..Default::default()
        };
        YahooClient::new(&config, cache).unwrap()
    }

    #[test]
    fn test_quote_envelope_mapping() {
        let envelope: QuoteEnvelope = serde_json::from_str(QUOTES).unwrap();
        let quotes = envelope.into_summaries();

        let spy = &quotes["SPY"];
        assert_eq!(spy.price, 581.2);
        assert_eq!(spy.volume, 51234567);
        assert_eq!(spy.company_name, "SPDR S&P 500 ETF Trust");
        assert_eq!(spy.day_low, 578.9);

        let qqq = &quotes["QQQ"];
        assert_eq!(qqq.company_name, "Invesco QQQ");
        assert_eq!(qqq.change, 0.0);
    }

    #[test]
    fn test_chart_envelope_drops_null_closes() {
        let envelope: ChartEnvelope = serde_json::from_str(CHART).unwrap();
        let series = envelope.into_series().unwrap();
        assert_eq!(series.timestamps, vec![1000, 1600]);
        assert_eq!(series.closes, vec![580.1, 581.4]);
    }

    #[test]
    fn test_chart_envelope_empty_result() {
        let envelope: ChartEnvelope =
            serde_json::from_str(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#)
                .unwrap();
        assert!(envelope.into_series().is_none());
    }

    #[tokio::test]
    async fn test_fetch_quotes_and_live_price() {
        let router = Router::new().route("/v7/finance/quote", get(|| async { QUOTES }));
        let base = serve(router).await;
        let cache = cache();
        let yahoo = client(&base, Arc::clone(&cache));

        let quotes = yahoo
            .fetch_quotes(&["SPY".to_string(), "QQQ".to_string()])
            .await;
        assert_eq!(quotes.len(), 2);
        assert!(cache.get("yahoo:quotes:SPY,QQQ").is_some());

        assert_eq!(yahoo.live_price("SPY").await, Some(581.2));
    }

    #[tokio::test]
    async fn test_fetch_intraday_series() {
        let router = Router::new().route("/v8/finance/chart/{symbol}", get(|| async { CHART }));
        let base = serve(router).await;
        let cache = cache();
        let yahoo = client(&base, Arc::clone(&cache));

        let series = yahoo.fetch_intraday_series("SPY").await.unwrap();
        assert_eq!(series.closes.len(), 2);
        assert!(cache.get("yahoo:spark:SPY").is_some());
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty() {
        let router = Router::new()
            .route(
                "/v7/finance/quote",
                get(|| async { (StatusCode::UNAUTHORIZED, "Invalid Crumb") }),
            )
            .route(
                "/v8/finance/chart/{symbol}",
                get(|| async { (StatusCode::NOT_FOUND, "{}") }),
            );
        let base = serve(router).await;
        let cache = cache();
        let yahoo = client(&base, Arc::clone(&cache));

        assert!(yahoo.fetch_quotes(&["SPY".to_string()]).await.is_empty());
        assert!(yahoo.fetch_intraday_series("SPY").await.is_none());
        assert_eq!(yahoo.live_price("SPY").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_degrades_to_empty() {
        let yahoo = client("http://127.0.0.1:1", cache());
        assert!(yahoo.fetch_quotes(&["SPY".to_string()]).await.is_empty());
        assert!(yahoo.fetch_intraday_series("SPY").await.is_none());
    }
}
