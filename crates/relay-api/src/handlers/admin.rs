//! Admin handlers

use axum::{extract::State, Json};
use relay_service::dto::PendingIntentsResponse;
use tracing::instrument;

use crate::extractors::Limit;
use crate::response::ApiResult;
use crate::state::AppState;

/// Intents recorded before a remote mutation and never confirmed
///
/// GET /admin/intents/pending?limit=
#[instrument(skip(state))]
pub async fn pending_intents(
    State(state): State<AppState>,
    Limit(limit): Limit,
) -> ApiResult<Json<PendingIntentsResponse>> {
    let intents = state
        .service_context()
        .intent_repo()
        .list_pending(limit)
        .await?;
    Ok(Json(PendingIntentsResponse::from(intents)))
}
