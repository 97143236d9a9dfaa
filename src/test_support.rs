//! Shared fixtures for handler tests: a mock options provider and state wiring.

use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Address that refuses connections.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

type Books = Arc<HashMap<String, Vec<Value>>>;

async fn snapshot(State(books): State<Books>, Path(symbol): Path<String>) -> Response {
    match books.get(&symbol) {
        Some(results) => axum::Json(json!({ "status": "OK", "results": results })).into_response(),
        None => (StatusCode::NOT_FOUND, "unknown underlying").into_response(),
    }
}

fn expiring(record: &Value) -> &str {
    record["details"]["expiration_date"].as_str().unwrap_or_default()
}

async fn filtered_snapshot(
    State(books): State<Books>,
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(results) = books.get(&symbol) else {
        return (StatusCode::NOT_FOUND, "unknown underlying").into_response();
    };
    let results: Vec<&Value> = results
        .iter()
        .filter(|r| params.get("expiration_date").is_none_or(|d| expiring(r) == d.as_str()))
        .filter(|r| {
            params
                .get("expiration_date.gte")
                .is_none_or(|d| expiring(r) >= d.as_str())
        })
        .collect();
    axum::Json(json!({ "status": "OK", "results": results })).into_response()
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock provider");
    let addr = listener.local_addr().expect("mock provider address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock provider");
    });
    format!("http://{}", addr)
}

/// Starts a mock snapshot provider serving `books` (symbol to raw records).
///
/// Unknown symbols answer 404. Expiration filters are ignored.
pub async fn mock_polygon(books: HashMap<String, Vec<Value>>) -> String {
    serve(
        Router::new()
            .route("/v3/snapshot/options/{symbol}", get(snapshot))
            .with_state(Arc::new(books)),
    )
    .await
}

/// Like [`mock_polygon`], but honours `expiration_date` and
/// `expiration_date.gte`.
pub async fn mock_polygon_filtered(books: HashMap<String, Vec<Value>>) -> String {
    serve(
        Router::new()
            .route("/v3/snapshot/options/{symbol}", get(filtered_snapshot))
            .with_state(Arc::new(books)),
    )
    .await
}

/// Starts a mock quote provider pricing `symbol` at `price`.
pub async fn mock_quote(symbol: &str, price: f64) -> String {
    let body = json!({
        "quoteResponse": {
            "result": [{ "symbol": symbol, "regularMarketPrice": price }]
        }
    });
    serve(Router::new().route(
        "/v7/finance/quote",
        get(move || async move { axum::Json(body) }),
    ))
    .await
}

/// State wired to `polygon_base` (with a credential) or to no provider at all.
///
/// The quote provider always points at an unreachable address.
pub fn state_with(polygon_base: Option<&str>) -> Arc<AppState> {
    state_with_quotes(polygon_base, UNREACHABLE)
}

/// [`state_with`], with the quote provider at `quotes_base`.
pub fn state_with_quotes(polygon_base: Option<&str>, quotes_base: &str) -> Arc<AppState> {
    let mut config = Config::default();
    config.primary.min_interval_ms = 1;
    config.primary.timeout_ms = 2_000;
    config.quotes.base_url = quotes_base.to_string();
    config.quotes.timeout_ms = 2_000;
    if let Some(base) = polygon_base {
        config.primary.base_url = base.to_string();
        config.primary.api_key = "test-key".to_string();
    }
    Arc::new(AppState::from_config(config).expect("state should build"))
}

/// One raw snapshot record.
pub fn record(
    contract_type: &str,
    expiration: NaiveDate,
    strike: f64,
    last: f64,
    volume: u64,
    open_interest: u64,
) -> Value {
    json!({
        "details": {
            "contract_type": contract_type,
            "expiration_date": expiration.to_string(),
            "strike_price": strike,
            "ticker": format!("O:TEST{}{}{}", expiration.format("%y%m%d"), &contract_type[..1].to_uppercase(), strike),
        },
        "day": { "close": last, "volume": volume },
        "open_interest": open_interest,
    })
}

/// Books keyed by symbol.
pub fn books<const N: usize>(entries: [(&str, Vec<Value>); N]) -> HashMap<String, Vec<Value>> {
    entries
        .into_iter()
        .map(|(symbol, records)| (symbol.to_string(), records))
        .collect()
}
