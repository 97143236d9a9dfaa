//! Equity quote snapshot and intraday sparkline.

use crate::models::{SnapshotResponse, SparklineResponse};
use crate::state::AppState;
use chrono::Utc;

/// Quote summaries for `symbols`; unknown symbols are absent.
pub async fn quote_snapshot(state: &AppState, symbols: &[String]) -> SnapshotResponse {
    SnapshotResponse {
        quotes: state.quotes.fetch_quotes(symbols).await,
        timestamp: Utc::now(),
    }
}

/// Today's intraday close series for `symbol`, `data: null` when unavailable.
pub async fn sparkline(state: &AppState, symbol: &str) -> SparklineResponse {
    SparklineResponse {
        data: state.quotes.fetch_intraday_series(symbol).await,
        timestamp: Utc::now(),
    }
}
