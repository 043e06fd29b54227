//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{admin, health, webhooks};
use crate::state::AppState;

/// Create the main router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(webhook_routes())
        .merge(admin_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// One ingress route per organization side
fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/webhooks/source", post(webhooks::source_webhook))
        .route("/webhooks/hub", post(webhooks::hub_webhook))
}

fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/intents/pending", get(admin::pending_intents))
}
