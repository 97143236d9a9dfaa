//! # Options Flow Backend - Market Data Aggregation Server
//!
//! An HTTP backend that serves options-market analytics to a dashboard.
//! It pulls option chains from a paid snapshot provider and equity quotes
//! from a public quote provider, normalizes both, computes derived
//! analytics and never lets an upstream failure reach the client: when the
//! providers are unavailable it answers with plausible synthetic data.
//! Built with [Axum](https://crates.io/crates/axum) and documented via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Single Query Endpoint**: `GET /api/options?type=...` serves chains,
//!   same-day scans, unusual activity, quotes, sparklines and the put/call
//!   ratio.
//!
//! - **Response Cache**: Provider responses are kept for 30 seconds in a
//!   shared in-memory cache.
//!
//! - **Rate Limiting**: Calls to the options provider are spaced at least
//!   200 ms apart across all concurrent requests.
//!
//! - **Graceful Degradation**: Provider failures fall back to synthetic
//!   chains, synthetic same-day contracts or neutral defaults.
//!
//! - **OpenAPI Documentation**: Swagger UI at `/swagger-ui/`.
//!
//! ## Architecture
//!
//! ```text
//! GET /api/options ─▶ dispatcher ─▶ queries::{chain, scanners, sentiment, quotes}
//!                                        │
//!                     ┌──────────────────┼───────────────────┐
//!                     ▼                  ▼                   ▼
//!              PolygonClient        YahooClient        fallback (synthetic)
//!                │      │                │
//!           RateLimiter TtlCache ◀───────┘
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers, dispatcher and router configuration |
//! | [`analytics`] | Price estimation, strike windowing, flow metrics |
//! | [`cache`] | Time-bounded response cache |
//! | [`config`] | TOML and environment configuration |
//! | [`error`] | API and provider error types |
//! | [`fallback`] | Synthetic chains and same-day contracts |
//! | [`models`] | Response DTOs with OpenAPI schemas |
//! | [`providers`] | Upstream clients and record normalization |
//! | [`queries`] | One handler per query kind |
//! | [`rate_limiter`] | Minimum-interval gate for the options provider |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/options?type=chain&symbol=SPY&expDate=YYYY-MM-DD` | Option chain |
//! | GET | `/api/options?type=0dte&symbols=SPY,QQQ` | Same-day contracts by volume |
//! | GET | `/api/options?type=unusual&symbols=TSLA` | Volume/open-interest outliers |
//! | GET | `/api/options?type=snapshot&symbols=SPY,DIA` | Equity quotes |
//! | GET | `/api/options?type=sparkline&symbol=SPY` | Intraday close series |
//! | GET | `/api/options?type=pcr` | Put/call volume ratio |
//!
//! ## Example Usage
//!
//! ```bash
//! # Development mode (synthetic chains without a credential)
//! cargo run
//!
//! # With a provider credential and custom port
//! POLYGON_API_KEY=... PORT=3000 cargo run
//!
//! # With a configuration file
//! CONFIG_PATH=config.toml cargo run
//!
//! curl "http://localhost:8080/api/options?type=chain&symbol=QQQ"
//! ```

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod models;
pub mod providers;
pub mod queries;
pub mod rate_limiter;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
