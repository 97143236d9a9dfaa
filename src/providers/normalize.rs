//! Raw provider record to uniform contract.
//!
//! These functions are total: any structurally valid record yields a
//! schema-complete [`OptionContract`], with zero standing in for every field
//! the provider left out.

use crate::models::{ContractType, OptionContract};
use crate::providers::polygon::{RawDay, RawOptionRecord};
use chrono::NaiveDate;

/// Builds an [`OptionContract`] from a raw record.
#[must_use]
pub fn normalize(record: &RawOptionRecord) -> OptionContract {
    let details = record.details.clone().unwrap_or_default();
    let day = record.day.clone().unwrap_or_default();
    let greeks = record.greeks.clone().unwrap_or_default();

    OptionContract {
        strike: finite(details.strike_price),
        last: last_price(record, &day),
        change: finite(day.change),
        change_percent: finite(day.change_percent),
        volume: count(day.volume),
        open_interest: count(record.open_interest),
        implied_volatility: finite(record.implied_volatility),
        delta: finite(greeks.delta),
        gamma: finite(greeks.gamma),
        theta: finite(greeks.theta),
        vega: finite(greeks.vega),
        vwap: finite(day.vwap),
        high: finite(day.high),
        low: finite(day.low),
        ticker: details.ticker.unwrap_or_default(),
    }
}

/// Call/put tag of a raw record, if recognizable.
#[must_use]
pub fn contract_type(record: &RawOptionRecord) -> Option<ContractType> {
    record
        .details
        .as_ref()?
        .contract_type
        .as_deref()
        .and_then(ContractType::from_tag)
}

/// Expiration date of a raw record, if present and well-formed.
#[must_use]
pub fn expiration(record: &RawOptionRecord) -> Option<NaiveDate> {
    let raw = record.details.as_ref()?.expiration_date.as_deref()?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

// Session close, then last trade, then zero.
fn last_price(record: &RawOptionRecord, day: &RawDay) -> f64 {
    [
        day.close,
        record.last_trade.as_ref().and_then(|t| t.price),
    ]
    .into_iter()
    .flatten()
    .find(|p| p.is_finite() && *p > 0.0)
    .unwrap_or(0.0)
}

fn finite(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}
