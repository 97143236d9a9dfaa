//! Request and response models for the REST API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl ContractType {
    /// Parses a provider `contract_type` tag (`"call"`, `"PUT"`, ...).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Some(Self::Call),
            "put" | "p" => Some(Self::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// One option instrument at one strike and expiry.
///
/// Zero in any decimal field means the provider had no value for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
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
    /// Implied volatility as a fraction.
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

/// Calls and puts of one symbol at one expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainSnapshot {
    /// Underlying symbol.
    pub symbol: String,
    /// Expiration the contracts belong to.
    #[schema(value_type = String, format = Date)]
    pub expiration_date: NaiveDate,
    /// Estimated underlying price.
    pub current_price: f64,
    /// Calls, ascending by strike.
    pub calls: Vec<OptionContract>,
    /// Puts, ascending by strike.
    pub puts: Vec<OptionContract>,
    /// Every expiration the provider returned, deduplicated and ascending.
    #[schema(value_type = Vec<String>)]
    pub available_expirations: Vec<NaiveDate>,
}

/// `type=chain` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainResponse {
    /// The assembled chain.
    #[serde(flatten)]
    pub snapshot: OptionChainSnapshot,
    /// Generation time.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Contract expiring on the day of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZeroDteContract {
    /// Underlying symbol.
    pub symbol: String,
    /// Option right.
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    /// Expiration date.
    #[schema(value_type = String, format = Date)]
    pub expiry: NaiveDate,
    /// Contract data.
    #[serde(flatten)]
    pub contract: OptionContract,
}

/// Contract whose volume dwarfs its open interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnusualActivityContract {
    /// Underlying symbol.
    pub symbol: String,
    /// Option right.
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    /// Expiration date.
    #[schema(value_type = String, format = Date)]
    pub expiry: NaiveDate,
    /// Volume divided by open interest.
    pub volume_to_open_interest_ratio: f64,
    /// Contract data.
    #[serde(flatten)]
    pub contract: OptionContract,
}

/// `type=0dte` response, also the body of the last-resort fallback.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZeroDteResponse {
    /// Contracts, by volume descending.
    pub contracts: Vec<ZeroDteContract>,
    /// Generation time.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    /// Set when the body was produced by the failure net.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `type=unusual` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnusualActivityResponse {
    /// Contracts, by volume/open-interest ratio descending.
    pub contracts: Vec<UnusualActivityContract>,
    /// Generation time.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Live equity quote summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
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
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SnapshotResponse {
    /// Quotes by symbol.
    pub quotes: HashMap<String, QuoteSummary>,
    /// Generation time.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Intraday price series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SparklineSeries {
    /// Unix timestamps in seconds.
    pub timestamps: Vec<i64>,
    /// Closing prices, one per timestamp.
    pub closes: Vec<f64>,
}

/// `type=sparkline` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SparklineResponse {
    /// Series, or `null` when unavailable.
    pub data: Option<SparklineSeries>,
    /// Generation time.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Put/call ratio sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Sentiment {
    /// Ratio below 0.7.
    Bullish,
    /// Ratio between 0.7 and 1.0 inclusive.
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

/// `type=pcr` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutCallRatioResponse {
    /// Put volume over call volume, two decimals.
    pub pcr: f64,
    /// Total put volume.
    pub total_puts: u64,
    /// Total call volume.
    pub total_calls: u64,
    /// Sentiment bucket.
    pub sentiment: Sentiment,
    /// Generation time.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Query kinds served by `/api/options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryKind {
    /// Option chain for one symbol and expiration.
    #[default]
    Chain,
    /// Same-day expirations across symbols.
    ZeroDte,
    /// Volume/open-interest outliers across symbols.
    Unusual,
    /// Live equity quotes.
    Snapshot,
    /// Intraday price series.
    Sparkline,
    /// Put/call volume ratio.
    PutCallRatio,
}

impl FromStr for QueryKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chain" => Ok(Self::Chain),
            "0dte" => Ok(Self::ZeroDte),
            "unusual" => Ok(Self::Unusual),
            "snapshot" => Ok(Self::Snapshot),
            "sparkline" => Ok(Self::Sparkline),
            "pcr" => Ok(Self::PutCallRatio),
            other => Err(ApiError::InvalidType(other.to_string())),
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chain => write!(f, "chain"),
            Self::ZeroDte => write!(f, "0dte"),
            Self::Unusual => write!(f, "unusual"),
            Self::Snapshot => write!(f, "snapshot"),
            Self::Sparkline => write!(f, "sparkline"),
            Self::PutCallRatio => write!(f, "pcr"),
        }
    }
}

/// Query parameters accepted by `/api/options`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OptionsQuery {
    /// One of `chain, 0dte, unusual, snapshot, sparkline, pcr` (default `chain`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Single ticker (default `SPY`).
    pub symbol: Option<String>,
    /// Comma-separated tickers for `0dte`, `unusual` and `snapshot`.
    pub symbols: Option<String>,
    /// Expiration date `YYYY-MM-DD`, only for `chain`.
    #[serde(rename = "expDate")]
    pub exp_date: Option<String>,
}

impl OptionsQuery {
    /// Parses the query kind; absent means `chain`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidType`] for an unknown kind.
    pub fn query_kind(&self) -> Result<QueryKind, ApiError> {
        match self.kind.as_deref().map(str::trim) {
            None | Some("") => Ok(QueryKind::default()),
            Some(kind) => kind.parse(),
        }
    }

    /// Upper-cased single symbol, or `default`.
    #[must_use]
    pub fn symbol_or(&self, default: &str) -> String {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_uppercase()
    }

    /// Upper-cased symbol list, or `defaults` when none were given.
    #[must_use]
    pub fn symbols_or(&self, defaults: &[String]) -> Vec<String> {
        let parsed: Vec<String> = self
            .symbols
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .collect();

        if parsed.is_empty() {
            defaults.iter().map(|s| s.to_uppercase()).collect()
        } else {
            parsed
        }
    }

    /// Parsed expiration date. Malformed dates are treated as absent.
    #[must_use]
    pub fn expiration(&self) -> Option<NaiveDate> {
        let raw = self.exp_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                tracing::warn!(exp_date = raw, "ignoring malformed expDate");
                None
            }
        }
    }
}
