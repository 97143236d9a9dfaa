//! Derived analytics over normalized contracts.
//!
//! Everything here is pure: at-the-money estimation, strike windowing,
//! unusual-activity screening and put/call sentiment.

use crate::models::{OptionContract, Sentiment};
use std::collections::BTreeMap;

/// Number of strikes kept on each side of the ATM index.
pub const WINDOW_HALF_WIDTH: usize = 15;

/// Lists longer than this are windowed.
pub const WINDOW_SIZE: usize = 2 * WINDOW_HALF_WIDTH;

/// Minimum volume for an unusual-activity hit.
pub const UNUSUAL_MIN_VOLUME: u64 = 500;

/// Volume must exceed open interest by this factor.
pub const UNUSUAL_VOLUME_MULTIPLE: u64 = 2;

/// Ratio below which sentiment is bullish.
pub const BULLISH_BELOW: f64 = 0.7;

/// Ratio above which sentiment is bearish.
pub const BEARISH_ABOVE: f64 = 1.0;

/// Where an ATM price estimate came from, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Strike where call and put prices are closest.
    PutCallParity,
    /// Middle of the sorted strike union.
    MiddleStrike,
    /// Live quote from the secondary provider.
    LiveQuote,
    /// Reference price of the synthetic data set.
    ReferencePrice,
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PutCallParity => write!(f, "put_call_parity"),
            Self::MiddleStrike => write!(f, "middle_strike"),
            Self::LiveQuote => write!(f, "live_quote"),
            Self::ReferencePrice => write!(f, "reference_price"),
        }
    }
}

// Strikes are paired on whole cents so float noise cannot split a pair.
fn strike_key(strike: f64) -> i64 {
    (strike * 100.0).round() as i64
}

/// Strike minimizing `|call.last - put.last|` among strikes quoted on both sides.
///
/// Ties resolve to the lower strike. `None` when no strike has both a call
/// and a put.
#[must_use]
pub fn put_call_parity_strike(calls: &[OptionContract], puts: &[OptionContract]) -> Option<f64> {
    let put_prices: BTreeMap<i64, f64> = puts
        .iter()
        .map(|p| (strike_key(p.strike), p.last))
        .collect();

    let mut best: Option<(f64, f64)> = None;
    let mut seen = BTreeMap::new();
    for call in calls {
        seen.entry(strike_key(call.strike)).or_insert(call);
    }

    for (key, call) in seen {
        let Some(put_last) = put_prices.get(&key) else {
            continue;
        };
        let diff = (call.last - put_last).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((call.strike, diff)),
        }
    }

    best.map(|(strike, _)| strike)
}

/// Middle element of the sorted, deduplicated union of call and put strikes.
#[must_use]
pub fn middle_strike(calls: &[OptionContract], puts: &[OptionContract]) -> Option<f64> {
    let union: BTreeMap<i64, f64> = calls
        .iter()
        .chain(puts)
        .map(|c| (strike_key(c.strike), c.strike))
        .collect();

    union.values().nth(union.len() / 2).copied()
}

/// Estimates the underlying price from the chain alone.
///
/// Tries [`PriceSource::PutCallParity`] then [`PriceSource::MiddleStrike`].
#[must_use]
pub fn estimate_from_chain(
    calls: &[OptionContract],
    puts: &[OptionContract],
) -> Option<(f64, PriceSource)> {
    put_call_parity_strike(calls, puts)
        .map(|p| (p, PriceSource::PutCallParity))
        .or_else(|| middle_strike(calls, puts).map(|p| (p, PriceSource::MiddleStrike)))
}

/// Insertion position of `atm` in a list sorted ascending by strike.
#[must_use]
pub fn atm_index(contracts: &[OptionContract], atm: f64) -> usize {
    contracts.partition_point(|c| c.strike < atm)
}

/// The `WINDOW_SIZE` contracts around `center`, shifted to stay in bounds.
///
/// Lists of at most `WINDOW_SIZE` entries come back whole.
#[must_use]
pub fn window_around(contracts: &[OptionContract], center: usize) -> &[OptionContract] {
    if contracts.len() <= WINDOW_SIZE {
        return contracts;
    }
    let end = (center.saturating_sub(WINDOW_HALF_WIDTH) + WINDOW_SIZE).min(contracts.len());
    let start = end - WINDOW_SIZE;
    &contracts[start..end]
}

/// Trims both lists to a window around `atm` when either exceeds `WINDOW_SIZE`.
///
/// The window is positional (by index in the sorted list), not by price
/// distance from `atm`.
#[must_use]
pub fn window_strikes(
    calls: Vec<OptionContract>,
    puts: Vec<OptionContract>,
    atm: f64,
) -> (Vec<OptionContract>, Vec<OptionContract>) {
    if calls.len() <= WINDOW_SIZE && puts.len() <= WINDOW_SIZE {
        return (calls, puts);
    }
    let calls = window_around(&calls, atm_index(&calls, atm)).to_vec();
    let puts = window_around(&puts, atm_index(&puts, atm)).to_vec();
    (calls, puts)
}

/// Whether a contract's volume stands out against its open interest.
#[must_use]
pub fn is_unusual(contract: &OptionContract) -> bool {
    contract.volume > UNUSUAL_MIN_VOLUME
        && contract.open_interest > 0
        && contract.volume > UNUSUAL_VOLUME_MULTIPLE * contract.open_interest
}

/// Volume over open interest; zero when open interest is zero.
#[must_use]
pub fn volume_to_open_interest(contract: &OptionContract) -> f64 {
    if contract.open_interest == 0 {
        0.0
    } else {
        contract.volume as f64 / contract.open_interest as f64
    }
}

/// Put volume over call volume; zero when there is no call volume.
#[must_use]
pub fn put_call_ratio(total_calls: u64, total_puts: u64) -> f64 {
    if total_calls == 0 {
        0.0
    } else {
        total_puts as f64 / total_calls as f64
    }
}

/// Buckets a put/call ratio. Both thresholds are strict.
#[must_use]
pub fn sentiment(ratio: f64) -> Sentiment {
    if ratio < BULLISH_BELOW {
        Sentiment::Bullish
    } else if ratio > BEARISH_ABOVE {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Rounds to two decimals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
