//! API routes module.

pub mod docs;
pub mod handlers;
pub mod routes;

pub use docs::ApiDoc;
pub use routes::{build_app, create_router};
