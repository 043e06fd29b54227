//! SyncIntent entity <-> model mapper

use relay_core::entities::{IntentStatus, SyncIntent};
use relay_core::error::DomainError;
use relay_core::events::EventKind;
use relay_core::value_objects::Direction;

use crate::models::SyncIntentModel;
use crate::repositories::error::invalid_column;

/// Convert SyncIntentModel to SyncIntent entity
impl TryFrom<SyncIntentModel> for SyncIntent {
    type Error = DomainError;

    fn try_from(model: SyncIntentModel) -> Result<Self, Self::Error> {
        Ok(SyncIntent {
            id: model.id,
            direction: Direction::parse(&model.direction)
                .ok_or_else(|| invalid_column("direction", &model.direction))?,
            event: EventKind::from_persisted(&model.event)
                .ok_or_else(|| invalid_column("event", &model.event))?,
            entity_id: model.entity_id,
            status: IntentStatus::parse(&model.status)
                .ok_or_else(|| invalid_column("status", &model.status))?,
            created_at: model.created_at,
            completed_at: model.completed_at,
        })
    }
}
