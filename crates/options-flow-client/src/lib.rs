//! HTTP client library for the Options Flow API.
//!
//! This crate provides a typed HTTP client for the Options Flow backend.
//! Every query kind served by `/api/options` has its own method.
//!
//! # Example
//!
//! ```no_run
//! use options_flow_client::{OptionsFlowClient, ClientConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), options_flow_client::Error> {
//!     let client = OptionsFlowClient::new(ClientConfig {
//!         base_url: "http://localhost:8080".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let chain = client.get_chain(Some("SPY"), None).await?;
//!     println!("{} calls around {}", chain.calls.len(), chain.current_price);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, OptionsFlowClient};
pub use error::Error;
pub use types::*;
