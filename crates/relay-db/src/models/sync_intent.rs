//! Sync intent database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the sync_intents table
#[derive(Debug, Clone, FromRow)]
pub struct SyncIntentModel {
    pub id: Uuid,
    pub direction: String,
    pub event: String,
    pub entity_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SyncIntentModel {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}
