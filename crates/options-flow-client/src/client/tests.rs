//! Unit tests for client module.

use super::*;
use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use tokio::net::TcpListener;

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_custom() {
    let config = ClientConfig {
        base_url: "http://api.example.com:9000".to_string(),
        timeout: Duration::from_secs(60),
    };

    assert_eq!(config.base_url, "http://api.example.com:9000");
    assert_eq!(config.timeout, Duration::from_secs(60));
}

// ============================================================================
// OptionsFlowClient Creation Tests
// ============================================================================

#[test]
fn test_client_new() {
    assert!(OptionsFlowClient::new(ClientConfig::default()).is_ok());
}

#[test]
fn test_client_base_url_trimmed() {
    let client = OptionsFlowClient::with_base_url("http://localhost:3000/").unwrap();
    assert_eq!(client.base_url, "http://localhost:3000");
}

// ============================================================================
// Query Building Tests
// ============================================================================

#[test]
fn test_join_symbols() {
    assert_eq!(join_symbols(&["SPY", " QQQ ", ""]), Some("SPY,QQQ".to_string()));
    assert_eq!(join_symbols(&[]), None);
    assert_eq!(join_symbols(&[" "]), None);
}

#[test]
fn test_non_blank() {
    assert_eq!(non_blank(" spy ").unwrap(), "spy");
    assert!(matches!(non_blank("  "), Err(Error::InvalidRequest(_))));
}

#[test]
fn test_options_query_encoding() {
    let mut query = OptionsQuery::new(QueryKind::Chain);
    query.symbol = Some("SPY".to_string());
    query.exp_date = Some("2026-10-16".to_string());
    assert_eq!(
        serde_urlencoded::to_string(&query).unwrap(),
        "type=chain&symbol=SPY&expDate=2026-10-16"
    );

    let mut query = OptionsQuery::new(QueryKind::ZeroDte);
    query.symbols = Some("SPY,QQQ".to_string());
    assert_eq!(
        serde_urlencoded::to_string(&query).unwrap(),
        "type=0dte&symbols=SPY%2CQQQ"
    );
}

// ============================================================================
// Request Tests
// ============================================================================

async fn serve(router: Router) -> OptionsFlowClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    OptionsFlowClient::with_base_url(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_put_call_ratio_request() {
    let router = Router::new().route(
        "/api/options",
        get(|uri: Uri| async move {
            assert_eq!(uri.query(), Some("type=pcr"));
            r#"{"pcr":0.5,"totalPuts":500,"totalCalls":1000,"sentiment":"Bullish","timestamp":"2026-10-16T14:30:00Z"}"#
        }),
    );
    let client = serve(router).await;

    let pcr = client.get_put_call_ratio().await.unwrap();
    assert_eq!(pcr.pcr, 0.5);
    assert_eq!(pcr.sentiment, Sentiment::Bullish);
    assert_eq!(pcr.total_calls, 1000);
}

#[tokio::test]
async fn test_api_error_message_extracted() {
    let router = Router::new().route(
        "/api/options",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                r#"{"error":"Invalid type: greeks","code":"INVALID_TYPE"}"#,
            )
        }),
    );
    let client = serve(router).await;

    let err = client.get_put_call_ratio().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid type: greeks");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_json_error() {
    let router = Router::new().route("/api/options", get(|| async { "not json" }));
    let client = serve(router).await;

    let err = client.get_sparkline("SPY").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_blank_symbol_rejected_before_request() {
    let client = OptionsFlowClient::with_base_url("http://127.0.0.1:1").unwrap();
    let err = client.get_sparkline(" ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let client = OptionsFlowClient::with_base_url("http://127.0.0.1:1").unwrap();
    let err = client.health_check().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
