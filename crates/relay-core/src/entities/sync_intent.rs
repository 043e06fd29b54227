//! SyncIntent entity - write-ahead record of a relayed mutation
//!
//! An intent is written as `pending` before the counterpart tracker is touched
//! and flipped to `done` once the mapping change has been persisted. Intents
//! left pending mark a remote/store divergence that needs reconciling.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::events::EventKind;
use crate::value_objects::Direction;

/// Intent lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    Pending,
    Done,
}

impl IntentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Write-ahead intent record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncIntent {
    pub id: Uuid,
    pub direction: Direction,
    pub event: EventKind,
    /// Id of the entity that changed on the origin side
    pub entity_id: i64,
    pub status: IntentStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SyncIntent {
    /// Create a new pending intent
    pub fn pending(direction: Direction, event: EventKind, entity_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            direction,
            event,
            entity_id,
            status: IntentStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == IntentStatus::Pending
    }
}
