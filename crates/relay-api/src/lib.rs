//! # relay-api
//!
//! Webhook ingress built with Axum. One route per organization side feeds
//! the sync engine; health and admin routes sit alongside.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use middleware::IngressSettings;
pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
