//! Put/call volume ratio for the market-wide sentiment gauge.

use crate::analytics;
use crate::models::{ContractType, PutCallRatioResponse, Sentiment};
use crate::providers::OptionsFilter;
use crate::providers::normalize::{contract_type, expiration, normalize};
use crate::state::AppState;
use chrono::Utc;
use tracing::{debug, warn};

/// Ratio reported when no same-day volume can be read.
pub const DEFAULT_PUT_CALL_RATIO: f64 = 0.85;

/// Same-day put volume over call volume for `symbol`.
///
/// Only records expiring today are counted. Provider failures and empty
/// results report [`DEFAULT_PUT_CALL_RATIO`] with zero totals. The sentiment
/// bucket is taken from the unrounded ratio; the reported ratio is rounded to
/// two decimals.
pub async fn put_call_ratio(state: &AppState, symbol: &str) -> PutCallRatioResponse {
    let today = state.today();
    let filter = OptionsFilter::expiring_on(today, state.request_limit());

    let records = state
        .options
        .fetch_options(symbol, &filter)
        .await
        .unwrap_or_default();
    let same_day: Vec<_> = records
        .iter()
        .filter(|record| expiration(record) == Some(today))
        .collect();
    if same_day.is_empty() {
        warn!(symbol, "no same-day volume, reporting default put/call ratio");
        return default_ratio();
    }

    let (mut total_calls, mut total_puts) = (0u64, 0u64);
    for record in same_day {
        match contract_type(record) {
            Some(ContractType::Call) => total_calls += normalize(record).volume,
            Some(ContractType::Put) => total_puts += normalize(record).volume,
            None => {}
        }
    }

    let ratio = analytics::put_call_ratio(total_calls, total_puts);
    debug!(symbol, total_calls, total_puts, ratio, "put/call ratio computed");

    PutCallRatioResponse {
        pcr: analytics::round2(ratio),
        total_puts,
        total_calls,
        sentiment: analytics::sentiment(ratio),
        timestamp: Utc::now(),
    }
}

fn default_ratio() -> PutCallRatioResponse {
    PutCallRatioResponse {
        pcr: DEFAULT_PUT_CALL_RATIO,
        total_puts: 0,
        total_calls: 0,
        sentiment: Sentiment::Neutral,
        timestamp: Utc::now(),
    }
}
