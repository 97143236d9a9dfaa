//! Synthetic option data used when every upstream source fails.
//!
//! Shapes are fixed (strike count, expirations, contracts per symbol) and
//! values are randomized around a reference price per symbol. Nothing here
//! touches the network or can fail.

use crate::models::{ContractType, OptionChainSnapshot, OptionContract, ZeroDteContract};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

/// Reference price for symbols without an entry in the table.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Strikes on each side of the money in a synthetic chain.
const CHAIN_HALF_WIDTH: i32 = 10;

/// Strikes on each side of the money in a synthetic 0DTE set.
const ZERO_DTE_HALF_WIDTH: i32 = 2;

/// Upcoming expirations listed in a synthetic chain.
const EXPIRATION_COUNT: usize = 5;

/// Maximum contracts in a synthetic 0DTE set.
const ZERO_DTE_LIMIT: usize = 20;

const BASE_PRICES: &[(&str, f64)] = &[
    ("SPY", 580.0),
    ("QQQ", 500.0),
    ("IWM", 220.0),
    ("DIA", 425.0),
    ("AAPL", 230.0),
    ("TSLA", 250.0),
    ("NVDA", 135.0),
    ("MSFT", 420.0),
    ("AMZN", 190.0),
    ("META", 560.0),
    ("GOOGL", 165.0),
    ("AMD", 150.0),
];

/// Reference price of `symbol`.
#[must_use]
pub fn base_price(symbol: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map_or(DEFAULT_BASE_PRICE, |(_, p)| *p)
}

/// Strike spacing for a given price level.
#[must_use]
pub fn strike_increment(price: f64) -> f64 {
    match price {
        p if p < 25.0 => 0.5,
        p if p < 200.0 => 1.0,
        p if p < 1_000.0 => 5.0,
        _ => 10.0,
    }
}

/// Synthetic chain for `symbol` expiring on `expiration` (default: next weekday on or after `today`).
#[must_use]
pub fn synthetic_chain(
    symbol: &str,
    expiration: Option<NaiveDate>,
    today: NaiveDate,
) -> OptionChainSnapshot {
    synthetic_chain_with(&mut rand::rng(), symbol, expiration, today)
}

/// [`synthetic_chain`] with an explicit random source.
pub fn synthetic_chain_with<R: Rng + ?Sized>(
    rng: &mut R,
    symbol: &str,
    expiration: Option<NaiveDate>,
    today: NaiveDate,
) -> OptionChainSnapshot {
    let spot = base_price(symbol);
    let increment = strike_increment(spot);
    let center = (spot / increment).round() * increment;

    let mut available_expirations = upcoming_weekdays(today, EXPIRATION_COUNT);
    let expiration_date = expiration
        .or_else(|| available_expirations.first().copied())
        .unwrap_or(today);
    if !available_expirations.contains(&expiration_date) {
        available_expirations.push(expiration_date);
        available_expirations.sort();
    }
    let days = (expiration_date - today).num_days().max(0) as f64;

    let mut calls = Vec::new();
    let mut puts = Vec::new();
    for step in -CHAIN_HALF_WIDTH..=CHAIN_HALF_WIDTH {
        let strike = center + f64::from(step) * increment;
        calls.push(contract(rng, symbol, ContractType::Call, expiration_date, spot, strike, days));
        puts.push(contract(rng, symbol, ContractType::Put, expiration_date, spot, strike, days));
    }

    OptionChainSnapshot {
        symbol: symbol.to_string(),
        expiration_date,
        current_price: spot,
        calls,
        puts,
        available_expirations,
    }
}

/// Synthetic same-day contracts for `symbols`, by volume descending.
#[must_use]
pub fn synthetic_zero_dte(symbols: &[String], today: NaiveDate) -> Vec<ZeroDteContract> {
    synthetic_zero_dte_with(&mut rand::rng(), symbols, today)
}

/// [`synthetic_zero_dte`] with an explicit random source.
pub fn synthetic_zero_dte_with<R: Rng + ?Sized>(
    rng: &mut R,
    symbols: &[String],
    today: NaiveDate,
) -> Vec<ZeroDteContract> {
    let mut contracts = Vec::new();
    for symbol in symbols {
        let spot = base_price(symbol);
        let increment = strike_increment(spot);
        let center = (spot / increment).round() * increment;

        for step in -ZERO_DTE_HALF_WIDTH..ZERO_DTE_HALF_WIDTH {
            for contract_type in [ContractType::Call, ContractType::Put] {
                let strike = center + f64::from(step) * increment;
                contracts.push(ZeroDteContract {
                    symbol: symbol.clone(),
                    contract_type,
                    expiry: today,
                    contract: contract(rng, symbol, contract_type, today, spot, strike, 0.0),
                });
            }
        }
    }

    contracts.sort_by(|a, b| b.contract.volume.cmp(&a.contract.volume));
    contracts.truncate(ZERO_DTE_LIMIT);
    contracts
}

/// The next `count` weekdays starting at `from` (inclusive).
#[must_use]
pub fn upcoming_weekdays(from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    from.iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .collect()
}

fn contract<R: Rng + ?Sized>(
    rng: &mut R,
    symbol: &str,
    contract_type: ContractType,
    expiration: NaiveDate,
    spot: f64,
    strike: f64,
    days: f64,
) -> OptionContract {
    let intrinsic = match contract_type {
        ContractType::Call => (spot - strike).max(0.0),
        ContractType::Put => (strike - spot).max(0.0),
    };

    // Time value decays with distance from the money and grows with time.
    let moneyness = (strike - spot) / spot;
    let time_factor = ((days + 1.0) / 365.0).sqrt();
    let time_value = spot * 0.02 * time_factor * (-(moneyness * 12.0).powi(2)).exp()
        * rng.random_range(0.85..1.15);
    let last = round_cents((intrinsic + time_value).max(0.01));

    let change = round_cents(last * rng.random_range(-0.25..0.25));
    let change_percent = if last - change > 0.0 {
        round_cents(change / (last - change) * 100.0)
    } else {
        0.0
    };

    let skew = match contract_type {
        ContractType::Call => -moneyness * 0.2,
        ContractType::Put => -moneyness * 0.4,
    };
    let implied_volatility = round4((0.18 + skew + rng.random_range(-0.03..0.03)).clamp(0.05, 3.0));

    // Logistic stand-in for N(d1), steep near the money.
    let call_delta = 1.0 / (1.0 + (moneyness * 25.0 / time_factor.max(0.05)).exp());
    let delta = match contract_type {
        ContractType::Call => call_delta,
        ContractType::Put => call_delta - 1.0,
    };
    let gamma = call_delta * (1.0 - call_delta) * 0.1;
    let theta = -(time_value / (days + 1.0)).min(last);
    let vega = spot * time_factor * 0.004;

    let liquidity = (-(moneyness * 20.0).powi(2)).exp();
    let volume = (rng.random_range(50.0..5_000.0) * (0.1 + liquidity)).round() as u64;
    let open_interest = (rng.random_range(200.0..20_000.0) * (0.2 + liquidity)).round() as u64;

    let high = round_cents(last * rng.random_range(1.0..1.2));
    let low = round_cents(last * rng.random_range(0.8..1.0));

    OptionContract {
        strike,
        last,
        change,
        change_percent,
        volume,
        open_interest,
        implied_volatility,
        delta: round4(delta),
        gamma: round4(gamma),
        theta: round4(theta),
        vega: round4(vega),
        vwap: round_cents((high + low + last) / 3.0),
        high,
        low,
        ticker: occ_ticker(symbol, expiration, contract_type, strike),
    }
}

/// OCC-style identifier, e.g. `O:SPY261016C00580000`.
fn occ_ticker(symbol: &str, expiration: NaiveDate, contract_type: ContractType, strike: f64) -> String {
    let right = match contract_type {
        ContractType::Call => 'C',
        ContractType::Put => 'P',
    };
    format!(
        "O:{}{}{}{:08}",
        symbol.to_uppercase(),
        expiration.format("%y%m%d"),
        right,
        (strike * 1000.0).round() as u64
    )
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
