//! OpenAPI documentation.

use crate::error::ErrorResponse;
use crate::models::{
    ChainResponse, ContractType, HealthResponse, OptionChainSnapshot, OptionContract,
    PutCallRatioResponse, QuoteSummary, Sentiment, SnapshotResponse, SparklineResponse,
    SparklineSeries, UnusualActivityContract, UnusualActivityResponse, ZeroDteContract,
    ZeroDteResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health_check,
        crate::api::handlers::get_options,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            ContractType,
            OptionContract,
            OptionChainSnapshot,
            ChainResponse,
            ZeroDteContract,
            ZeroDteResponse,
            UnusualActivityContract,
            UnusualActivityResponse,
            QuoteSummary,
            SnapshotResponse,
            SparklineSeries,
            SparklineResponse,
            Sentiment,
            PutCallRatioResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Options", description = "Options and equity market data"),
    ),
    info(
        title = "Options Flow API",
        version = "0.1.0",
        description = "Aggregated options chains, flow scans and equity quotes",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/options"));
    }

    #[test]
    fn test_openapi_lists_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("ChainResponse"));
        assert!(schemas.contains_key("PutCallRatioResponse"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
