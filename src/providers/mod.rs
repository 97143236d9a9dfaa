//! Upstream market-data providers.
//!
//! | Module | Provider |
//! |--------|----------|
//! | [`polygon`] | Primary options-chain snapshots (bearer token, rate limited) |
//! | [`yahoo`] | Secondary equity quotes and intraday charts (public) |
//! | [`normalize`] | Raw option record to [`crate::models::OptionContract`] |

pub mod normalize;
pub mod polygon;
pub mod yahoo;

use crate::cache::TtlCache;
use crate::error::ProviderError;
use crate::models::{QuoteSummary, SparklineSeries};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;

pub use polygon::{ExpirationFilter, OptionsFilter, PolygonClient, RawOptionRecord};
pub use yahoo::YahooClient;

/// Payloads stored in the shared response cache.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    /// Raw option snapshot records.
    Options(Arc<Vec<RawOptionRecord>>),
    /// Quote summaries by symbol.
    Quotes(HashMap<String, QuoteSummary>),
    /// Intraday close series.
    Spark(SparklineSeries),
}

/// Cache shared by both provider clients.
pub type ResponseCache = TtlCache<CachedPayload>;

/// Appends `segments` to `base`, percent-encoding each one, and sets `query`.
///
/// Symbols come from the request, so `/`, `?` and `#` must stay inside
/// their segment.
pub(crate) fn endpoint(
    base: &str,
    segments: &[&str],
    query: Option<&str>,
) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base).map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ProviderError::InvalidUrl(format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    url.set_query(query);
    Ok(url)
}

/// Truncates an upstream error body for logging.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
