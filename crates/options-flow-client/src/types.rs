//! Request and response types for the options flow API.
//!
//! Dates and timestamps are kept as the strings the server sends
//! (`YYYY-MM-DD` and RFC 3339).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;


/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Put/call ratio sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    /// Ratio below 0.7.
    Bullish,
    /// Ratio between 0.7 and 1.0.
    Neutral,
    /// Ratio above 1.0.
    Bearish,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Query kind sent as the `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryKind {
    /// Option chain.
    #[serde(rename = "chain")]
    Chain,
    /// Same-day contracts.
    #[serde(rename = "0dte")]
    ZeroDte,
    /// Unusual activity.
    #[serde(rename = "unusual")]
    Unusual,
    /// Equity quotes.
    #[serde(rename = "snapshot")]
    Snapshot,
    /// Intraday series.
    #[serde(rename = "sparkline")]
    Sparkline,
    /// Put/call ratio.
    #[serde(rename = "pcr")]
    PutCallRatio,
}

/// Query string of `/api/options`.
#[derive(Debug, Clone, Serialize)]
pub struct OptionsQuery {
    /// Query kind.
    #[serde(rename = "type")]
    pub kind: QueryKind,
    /// Single ticker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Comma-separated tickers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
    /// Expiration date `YYYY-MM-DD`.
    #[serde(rename = "expDate", skip_serializing_if = "Option::is_none")]
    pub exp_date: Option<String>,
}

impl OptionsQuery {
    /// Query of `kind` with no other parameters.
    #[must_use]
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            symbol: None,
            symbols: None,
            exp_date: None,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

// ============================================================================
// Options
// ============================================================================

/// One option instrument at one strike and expiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    /// Strike price.
    pub strike: f64,
    /// Last traded price.
    pub last: f64,
    /// Session price change.
    pub change: f64,
    /// Session price change in percent.
    pub change_percent: f64,
    /// Session volume.
    pub volume: u64,
    /// Open interest.
    pub open_interest: u64,
    /// Implied volatility.
    pub implied_volatility: f64,
    /// Delta.
    pub delta: f64,
    /// Gamma.
    pub gamma: f64,
    /// Theta.
    pub theta: f64,
    /// Vega.
    pub vega: f64,
    /// Volume-weighted average price.
    pub vwap: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Provider instrument identifier.
    pub ticker: String,
}

/// `type=chain` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainResponse {
    /// Underlying symbol.
    pub symbol: String,
    /// Expiration date.
    pub expiration_date: String,
    /// Estimated underlying price.
    pub current_price: f64,
    /// Calls, ascending by strike.
    pub calls: Vec<OptionContract>,
    /// Puts, ascending by strike.
    pub puts: Vec<OptionContract>,
    /// Expirations available for the symbol.
    pub available_expirations: Vec<String>,
    /// Generation time.
    pub timestamp: String,
}

/// Same-day contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroDteContract {
    /// Underlying symbol.
    pub symbol: String,
    /// Option right.
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    /// Expiration date.
    pub expiry: String,
    /// Contract data.
    #[serde(flatten)]
    pub contract: OptionContract,
}

/// `type=0dte` response; `error` is set on fallback bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroDteResponse {
    /// Contracts by volume descending.
    pub contracts: Vec<ZeroDteContract>,
    /// Generation time.
    pub timestamp: String,
    /// Fallback marker.
    #[serde(default)]
    pub error: Option<String>,
}

/// Unusual-activity contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusualActivityContract {
    /// Underlying symbol.
    pub symbol: String,
    /// Option right.
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    /// Expiration date.
    pub expiry: String,
    /// Volume over open interest.
    pub volume_to_open_interest_ratio: f64,
    /// Contract data.
    #[serde(flatten)]
    pub contract: OptionContract,
}

/// `type=unusual` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusualActivityResponse {
    /// Contracts by ratio descending.
    pub contracts: Vec<UnusualActivityContract>,
    /// Generation time.
    pub timestamp: String,
}

// ============================================================================
// Quotes
// ============================================================================

/// Equity quote summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    /// Last price.
    pub price: f64,
    /// Session change.
    pub change: f64,
    /// Session change in percent.
    pub change_percent: f64,
    /// Session volume.
    pub volume: u64,
    /// Company or fund name.
    pub company_name: String,
    /// Session high.
    pub day_high: f64,
    /// Session low.
    pub day_low: f64,
}

/// `type=snapshot` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    /// Quotes by symbol.
    pub quotes: HashMap<String, QuoteSummary>,
    /// Generation time.
    pub timestamp: String,
}

/// Intraday series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparklineSeries {
    /// Unix timestamps in seconds.
    pub timestamps: Vec<i64>,
    /// Closing prices.
    pub closes: Vec<f64>,
}

/// `type=sparkline` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparklineResponse {
    /// Series, absent when unavailable.
    pub data: Option<SparklineSeries>,
    /// Generation time.
    pub timestamp: String,
}

/// `type=pcr` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutCallRatioResponse {
    /// Put volume over call volume.
    pub pcr: f64,
    /// Total put volume.
    pub total_puts: u64,
    /// Total call volume.
    pub total_calls: u64,
    /// Sentiment bucket.
    pub sentiment: Sentiment,
    /// Generation time.
    pub timestamp: String,
}
