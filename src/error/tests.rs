//! Unit tests for error module.

use super::*;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Something went wrong".to_string(),
        code: "INVALID_QUERY".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"Something went wrong\""));
    assert!(json.contains("\"code\":\"INVALID_QUERY\""));
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_invalid_type_display() {
    let error = ApiError::InvalidType("greeks".to_string());
    let display = format!("{}", error);
    assert!(display.starts_with("Invalid type: greeks"));
    assert!(display.contains("0dte"));
}

#[test]
fn test_api_error_invalid_query_display() {
    let error = ApiError::InvalidQuery("duplicate field `type`".to_string());
    assert_eq!(format!("{}", error), "Invalid query: duplicate field `type`");
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[test]
fn test_api_error_invalid_type_status() {
    let response = ApiError::InvalidType("x".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_api_error_invalid_query_status() {
    let response = ApiError::InvalidQuery("x".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_error_invalid_type_body() {
    let response = ApiError::InvalidType("bogus".to_string()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["code"], "INVALID_TYPE");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid type"));
}

// ============================================================================
// ProviderError Tests
// ============================================================================

#[test]
fn test_provider_error_status_display() {
    let error = ProviderError::Status {
        status: 403,
        body: "NOT_AUTHORIZED".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("403"));
    assert!(display.contains("NOT_AUTHORIZED"));
}

#[test]
fn test_provider_error_missing_credential_display() {
    assert_eq!(
        ProviderError::MissingCredential.to_string(),
        "provider credential is not configured"
    );
}

#[test]
fn test_provider_error_timeout_display() {
    assert_eq!(ProviderError::Timeout.to_string(), "request timed out");
}

#[test]
fn test_provider_error_invalid_url_display() {
    let error = ProviderError::InvalidUrl("relative URL without a base".to_string());
    assert_eq!(
        error.to_string(),
        "invalid request url: relative URL without a base"
    );
}
