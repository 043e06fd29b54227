//! Webhook ingress handlers
//!
//! The route a delivery arrives on fixes its direction. The event type comes
//! from `X-GitHub-Event`; the delivery id is recorded on the span.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use relay_core::value_objects::Direction;
use relay_service::{SyncResponse, SyncService, WebhookPayload};
use tracing::{field, info, instrument, Span};

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the webhook event type
pub const EVENT_HEADER: &str = "x-github-event";
/// Header carrying the unique delivery id
pub const DELIVERY_HEADER: &str = "x-github-delivery";
/// Event type sent when a webhook is first configured
pub const PING_EVENT: &str = "ping";

/// POST /webhooks/source
pub async fn source_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SyncResponse>> {
    dispatch(&state, Direction::SourceToHub, &headers, &body).await
}

/// POST /webhooks/hub
pub async fn hub_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<SyncResponse>> {
    dispatch(&state, Direction::HubToSource, &headers, &body).await
}

#[instrument(
    skip_all,
    fields(
        direction = %direction,
        event_type = field::Empty,
        delivery = field::Empty,
        installation_id = field::Empty,
    )
)]
async fn dispatch(
    state: &AppState,
    direction: Direction,
    headers: &HeaderMap,
    body: &[u8],
) -> ApiResult<Json<SyncResponse>> {
    let span = Span::current();
    if let Some(delivery) = header_str(headers, DELIVERY_HEADER) {
        span.record("delivery", delivery);
    }

    let event_type = header_str(headers, EVENT_HEADER)
        .ok_or_else(|| ApiError::invalid_header("missing X-GitHub-Event header"))?;
    span.record("event_type", event_type);

    if event_type == PING_EVENT {
        info!("Webhook ping received");
        return Ok(Json(SyncResponse::ping(direction)));
    }

    let payload = WebhookPayload::from_slice(body)?;
    if let Some(installation_id) = payload.installation_id() {
        span.record("installation_id", installation_id);
    }
    let event = payload.into_event(event_type)?;

    let response = SyncService::new(state.service_context())
        .handle(direction, event)
        .await?;
    Ok(Json(response))
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
