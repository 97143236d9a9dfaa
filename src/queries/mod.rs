//! Query handlers behind `/api/options`.
//!
//! Each handler composes the provider clients, the normalizer, the
//! analytics and the synthesizer into one response shape. None of them can
//! fail: provider errors are matched here and turned into synthetic data or
//! empty results.

pub mod chain;
pub mod quotes;
pub mod scanners;
pub mod sentiment;

pub use chain::option_chain;
pub use quotes::{quote_snapshot, sparkline};
pub use scanners::{unusual_activity, zero_dte};
pub use sentiment::put_call_ratio;
