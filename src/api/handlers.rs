//! API request handlers.

use crate::error::ApiError;
use crate::fallback;
use crate::models::{
    ChainResponse, HealthResponse, OptionsQuery, QueryKind, UnusualActivityResponse,
    ZeroDteResponse,
};
use crate::queries;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error};

/// Marker set on bodies produced by the failure net.
pub const FALLBACK_ERROR: &str = "Fallback data";

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Options Queries
// ============================================================================

/// Single market-data endpoint, dispatched on `type`.
///
/// | `type` | Body |
/// |--------|------|
/// | `chain` (default) | `ChainResponse` |
/// | `0dte` | `ZeroDteResponse` |
/// | `unusual` | `UnusualActivityResponse` |
/// | `snapshot` | `SnapshotResponse` |
/// | `sparkline` | `SparklineResponse` |
/// | `pcr` | `PutCallRatioResponse` |
///
/// Any failure past type validation answers 200 with synthetic same-day
/// contracts and `"error": "Fallback data"`.
#[utoipa::path(
    get,
    path = "/api/options",
    params(OptionsQuery),
    responses(
        (status = 200, description = "Query result; the body shape depends on `type`", body = ChainResponse),
        (status = 400, description = "Unknown `type` or undecodable query", body = crate::error::ErrorResponse)
    ),
    tag = "Options"
)]
pub async fn get_options(
    State(state): State<Arc<AppState>>,
    query: Result<Query<OptionsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return ApiError::InvalidQuery(rejection.body_text()).into_response(),
    };
    let kind = match query.query_kind() {
        Ok(kind) => kind,
        Err(err) => return err.into_response(),
    };
    debug!(%kind, "options query");

    with_fallback(&state, dispatch(&state, kind, &query)).await
}

async fn dispatch(state: &AppState, kind: QueryKind, query: &OptionsQuery) -> Response {
    let defaults = &state.config.defaults;
    match kind {
        QueryKind::Chain => {
            let symbol = query.symbol_or(&defaults.symbol);
            let snapshot = queries::option_chain(state, &symbol, query.expiration()).await;
            Json(ChainResponse {
                snapshot,
                timestamp: Utc::now(),
            })
            .into_response()
        }
        QueryKind::ZeroDte => {
            let symbols = query.symbols_or(&defaults.zero_dte_symbols);
            Json(ZeroDteResponse {
                contracts: queries::zero_dte(state, &symbols).await,
                timestamp: Utc::now(),
                error: None,
            })
            .into_response()
        }
        QueryKind::Unusual => {
            let symbols = query.symbols_or(&defaults.unusual_symbols);
            Json(UnusualActivityResponse {
                contracts: queries::unusual_activity(state, &symbols).await,
                timestamp: Utc::now(),
            })
            .into_response()
        }
        QueryKind::Snapshot => {
            let symbols = query.symbols_or(&defaults.snapshot_symbols);
            Json(queries::quote_snapshot(state, &symbols).await).into_response()
        }
        QueryKind::Sparkline => {
            let symbol = query.symbol_or(&defaults.symbol);
            Json(queries::sparkline(state, &symbol).await).into_response()
        }
        QueryKind::PutCallRatio => {
            Json(queries::put_call_ratio(state, &defaults.pcr_symbol).await).into_response()
        }
    }
}

/// Runs `handler`, answering with [`fallback_response`] if it panics.
pub async fn with_fallback<F>(state: &AppState, handler: F) -> Response
where
    F: Future<Output = Response>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            error!("query handler failed, serving fallback data");
            fallback_response(state)
        }
    }
}

/// Synthetic same-day contracts for the default symbols, marked as fallback.
#[must_use]
pub fn fallback_response(state: &AppState) -> Response {
    let contracts =
        fallback::synthetic_zero_dte(&state.config.defaults.zero_dte_symbols, state.today());
    Json(ZeroDteResponse {
        contracts,
        timestamp: Utc::now(),
        error: Some(FALLBACK_ERROR.to_string()),
    })
    .into_response()
}
