//! Option chain for one symbol and one expiration.

use crate::analytics::{self, PriceSource};
use crate::fallback;
use crate::models::{ContractType, OptionChainSnapshot, OptionContract};
use crate::providers::normalize::{contract_type, expiration, normalize};
use crate::providers::{OptionsFilter, RawOptionRecord};
use crate::state::AppState;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Calls and puts of the target expiration before pricing and windowing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainParts {
    /// Target expiration.
    pub expiration: NaiveDate,
    /// Calls, ascending by strike.
    pub calls: Vec<OptionContract>,
    /// Puts, ascending by strike.
    pub puts: Vec<OptionContract>,
    /// Distinct expirations present, ascending.
    pub available: Vec<NaiveDate>,
}

/// Builds the option chain for `symbol`.
///
/// Uses `requested` as the target expiration when given (even if the
/// provider has no contracts for it), otherwise the earliest expiration the
/// provider returned. Falls back to a synthetic chain when the provider
/// fails or returns nothing usable.
pub async fn option_chain(
    state: &AppState,
    symbol: &str,
    requested: Option<NaiveDate>,
) -> OptionChainSnapshot {
    let today = state.today();
    let filter = match requested {
        Some(date) => OptionsFilter::expiring_on(date, state.request_limit()),
        None => OptionsFilter::expiring_from(today, state.request_limit()),
    };

    let parts = match state.options.fetch_options(symbol, &filter).await {
        Ok(records) => partition_chain(&records, requested),
        Err(_) => None,
    };
    let Some(parts) = parts else {
        warn!(symbol, "serving synthetic option chain");
        return fallback::synthetic_chain(symbol, requested, today);
    };

    let (current_price, source) = match analytics::estimate_from_chain(&parts.calls, &parts.puts)
    {
        Some(estimate) => estimate,
        None => match state.quotes.live_price(symbol).await {
            Some(price) => (price, PriceSource::LiveQuote),
            None => (fallback::base_price(symbol), PriceSource::ReferencePrice),
        },
    };
    debug!(symbol, current_price, %source, "estimated underlying price");

    let (calls, puts) = analytics::window_strikes(parts.calls, parts.puts, current_price);

    OptionChainSnapshot {
        symbol: symbol.to_string(),
        expiration_date: parts.expiration,
        current_price,
        calls,
        puts,
        available_expirations: parts.available,
    }
}

/// Splits raw records of the target expiration into sorted calls and puts.
///
/// Returns `None` when there are no records or no usable expiration.
#[must_use]
pub fn partition_chain(
    records: &[RawOptionRecord],
    requested: Option<NaiveDate>,
) -> Option<ChainParts> {
    if records.is_empty() {
        return None;
    }

    let available: Vec<NaiveDate> = records
        .iter()
        .filter_map(expiration)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let target = requested.or_else(|| available.first().copied())?;

    let mut calls = Vec::new();
    let mut puts = Vec::new();
    for record in records.iter().filter(|r| expiration(r) == Some(target)) {
        match contract_type(record) {
            Some(ContractType::Call) => calls.push(normalize(record)),
            Some(ContractType::Put) => puts.push(normalize(record)),
            None => {}
        }
    }
    calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    Some(ChainParts {
        expiration: target,
        calls,
        puts,
        available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{books, mock_polygon, mock_quote, record, state_with, state_with_quotes};

    fn raw(values: Vec<serde_json::Value>) -> Vec<RawOptionRecord> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_partition_picks_earliest_expiration() {
        let near = date(2026, 10, 16);
        let far = date(2026, 10, 23);
        let records = raw(vec![
            record("call", far, 100.0, 2.0, 1, 1),
            record("call", near, 105.0, 1.0, 1, 1),
            record("call", near, 100.0, 3.0, 1, 1),
            record("put", near, 100.0, 2.5, 1, 1),
            record("put", far, 100.0, 2.5, 1, 1),
        ]);

        let parts = partition_chain(&records, None).unwrap();
        assert_eq!(parts.expiration, near);
        assert_eq!(parts.available, vec![near, far]);
        assert_eq!(parts.calls.len(), 2);
        assert_eq!(parts.calls[0].strike, 100.0);
        assert_eq!(parts.calls[1].strike, 105.0);
        assert_eq!(parts.puts.len(), 1);
    }

    #[test]
    fn test_partition_keeps_absent_requested_date() {
        let near = date(2026, 10, 16);
        let missing = date(2026, 11, 20);
        let records = raw(vec![record("call", near, 100.0, 2.0, 1, 1)]);

        let parts = partition_chain(&records, Some(missing)).unwrap();
        assert_eq!(parts.expiration, missing);
        assert!(parts.calls.is_empty());
        assert!(parts.puts.is_empty());
        assert_eq!(parts.available, vec![near]);
    }

    #[test]
    fn test_partition_empty_records() {
        assert!(partition_chain(&[], None).is_none());
    }

    #[test]
    fn test_partition_without_expirations() {
        let records = raw(vec![serde_json::json!({"details": {"contract_type": "call"}})]);
        assert!(partition_chain(&records, None).is_none());
    }

    #[tokio::test]
    async fn test_chain_uses_parity_price() {
        let state = state_with(None);
        let exp = state.today() + chrono::Duration::days(3);
        let base = mock_polygon(books([(
            "SPY",
            vec![
                record("call", exp, 100.0, 5.0, 10, 10),
                record("call", exp, 105.0, 3.0, 10, 10),
                record("put", exp, 100.0, 3.2, 10, 10),
                record("put", exp, 105.0, 5.1, 10, 10),
            ],
        )]))
        .await;
        let state = state_with(Some(&base));

        let chain = option_chain(&state, "SPY", None).await;
        assert_eq!(chain.current_price, 100.0);
        assert_eq!(chain.expiration_date, exp);
        assert_eq!(chain.calls.len(), 2);
        assert_eq!(chain.puts.len(), 2);
    }

    #[tokio::test]
    async fn test_chain_windows_long_ladders() {
        let state = state_with(None);
        let exp = state.today();
        let mut records = Vec::new();
        for i in 0..40 {
            let strike = 100.0 + i as f64;
            // Call and put prices cross at strike 120.
            let call_last = (140.0 - strike) / 2.0;
            let put_last = (strike - 100.0) / 2.0;
            records.push(record("call", exp, strike, call_last, 10, 10));
            records.push(record("put", exp, strike, put_last, 10, 10));
        }
        let base = mock_polygon(books([("QQQ", records)])).await;
        let state = state_with(Some(&base));

        let chain = option_chain(&state, "QQQ", None).await;
        assert_eq!(chain.current_price, 120.0);
        assert_eq!(chain.calls.len(), 30);
        assert_eq!(chain.puts.len(), 30);
        assert_eq!(chain.calls.first().unwrap().strike, 105.0);
        assert_eq!(chain.calls.last().unwrap().strike, 134.0);
    }

    #[tokio::test]
    async fn test_chain_falls_back_on_provider_error() {
        let base = mock_polygon(books([])).await;
        let state = state_with(Some(&base));

        let chain = option_chain(&state, "SPY", None).await;
        assert!(!chain.calls.is_empty());
        assert!(!chain.puts.is_empty());
        assert_eq!(chain.current_price, fallback::base_price("SPY"));
    }

    #[tokio::test]
    async fn test_chain_falls_back_on_empty_result() {
        let base = mock_polygon(books([("IWM", vec![])])).await;
        let state = state_with(Some(&base));

        let chain = option_chain(&state, "IWM", None).await;
        assert_eq!(chain.calls.len(), 21);
    }

    #[tokio::test]
    async fn test_chain_requested_missing_date_uses_reference_price() {
        let state = state_with(None);
        let exp = state.today();
        let missing = exp + chrono::Duration::days(30);
        let base = mock_polygon(books([(
            "AAPL",
            vec![record("call", exp, 230.0, 4.0, 10, 10)],
        )]))
        .await;
        let state = state_with(Some(&base));

        let chain = option_chain(&state, "AAPL", Some(missing)).await;
        assert_eq!(chain.expiration_date, missing);
        assert!(chain.calls.is_empty());
        assert!(chain.puts.is_empty());
        // No live quote is reachable, so the reference price is used.
        assert_eq!(chain.current_price, fallback::base_price("AAPL"));
    }

    #[tokio::test]
    async fn test_chain_requested_missing_date_uses_live_quote() {
        let state = state_with(None);
        let exp = state.today();
        let missing = exp + chrono::Duration::days(30);
        let base = mock_polygon(books([(
            "AAPL",
            vec![record("call", exp, 230.0, 4.0, 10, 10)],
        )]))
        .await;
        let quotes = mock_quote("AAPL", 231.5).await;
        let state = state_with_quotes(Some(&base), &quotes);

        let chain = option_chain(&state, "AAPL", Some(missing)).await;
        assert_eq!(chain.expiration_date, missing);
        assert!(chain.calls.is_empty());
        assert_eq!(chain.current_price, 231.5);
    }
}
