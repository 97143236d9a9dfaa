//! Cross-symbol scans: same-day expirations and unusual activity.

use crate::analytics;
use crate::fallback;
use crate::models::{UnusualActivityContract, ZeroDteContract};
use crate::providers::OptionsFilter;
use crate::providers::normalize::{contract_type, expiration, normalize};
use crate::state::AppState;
use tracing::{debug, warn};

/// Maximum contracts returned by either scan.
pub const SCAN_LIMIT: usize = 20;

/// Highest-volume contracts expiring today across `symbols`.
///
/// Symbols are fetched one after another. Records not expiring today are
/// dropped even if the provider returned them. A failing symbol contributes
/// nothing; when every symbol comes back empty the scan answers with
/// synthetic contracts instead.
pub async fn zero_dte(state: &AppState, symbols: &[String]) -> Vec<ZeroDteContract> {
    let today = state.today();
    let filter = OptionsFilter::expiring_on(today, state.request_limit());

    let mut contracts = Vec::new();
    for symbol in symbols {
        let Ok(records) = state.options.fetch_options(symbol, &filter).await else {
            continue;
        };
        contracts.extend(
            records
                .iter()
                .filter(|record| expiration(record) == Some(today))
                .filter_map(|record| {
                    Some(ZeroDteContract {
                        symbol: symbol.clone(),
                        contract_type: contract_type(record)?,
                        expiry: today,
                        contract: normalize(record),
                    })
                }),
        );
    }

    if contracts.is_empty() {
        warn!(symbols = symbols.len(), "no same-day contracts found, serving synthetic data");
        return fallback::synthetic_zero_dte(symbols, today);
    }

    contracts.sort_by(|a, b| b.contract.volume.cmp(&a.contract.volume));
    contracts.truncate(SCAN_LIMIT);
    debug!(count = contracts.len(), "same-day scan complete");
    contracts
}

/// Contracts across `symbols` whose volume stands out against open interest.
///
/// Considers every expiration from today on. Ordered by the
/// volume-to-open-interest ratio, highest first. No synthetic fallback: an
/// empty list is a valid answer.
pub async fn unusual_activity(state: &AppState, symbols: &[String]) -> Vec<UnusualActivityContract> {
    let today = state.today();
    let filter = OptionsFilter::expiring_from(today, state.request_limit());

    let mut flagged = Vec::new();
    for symbol in symbols {
        let Ok(records) = state.options.fetch_options(symbol, &filter).await else {
            continue;
        };
        for record in records.iter() {
            let Some(kind) = contract_type(record) else {
                continue;
            };
            let contract = normalize(record);
            if !analytics::is_unusual(&contract) {
                continue;
            }
            flagged.push(UnusualActivityContract {
                symbol: symbol.clone(),
                contract_type: kind,
                expiry: expiration(record).unwrap_or(today),
                volume_to_open_interest_ratio: analytics::volume_to_open_interest(&contract),
                contract,
            });
        }
    }

    flagged.sort_by(|a, b| {
        b.volume_to_open_interest_ratio
            .total_cmp(&a.volume_to_open_interest_ratio)
    });
    flagged.truncate(SCAN_LIMIT);
    debug!(count = flagged.len(), "unusual activity scan complete");
    flagged
}
