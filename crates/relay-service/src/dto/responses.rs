//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use relay_core::entities::SyncIntent;
use relay_core::events::EventKind;
use relay_core::value_objects::Direction;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Webhook Responses
// ============================================================================

/// What the relay did with a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Applied,
    Ignored,
}

/// Why a delivery was acknowledged without acting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Webhook configuration check
    Ping,
    /// Raised by one of the synchronizing apps
    SynchronizedActor,
    /// Issue opened directly in the hub has nowhere to go
    HubNativeIssue,
    /// Edit that changed neither title nor body
    NoChanges,
    /// Hub event from a repository other than the mirror repository
    ForeignRepository,
}

/// Result of handling one webhook delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResponse {
    pub outcome: Outcome,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IgnoreReason>,
    /// Intent written for the relayed mutation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_id: Option<Uuid>,
}

impl SyncResponse {
    pub fn applied(direction: Direction, event: EventKind, intent_id: Uuid) -> Self {
        Self {
            outcome: Outcome::Applied,
            direction,
            event: Some(event),
            reason: None,
            intent_id: Some(intent_id),
        }
    }

    pub fn ignored(direction: Direction, event: EventKind, reason: IgnoreReason) -> Self {
        Self {
            outcome: Outcome::Ignored,
            direction,
            event: Some(event),
            reason: Some(reason),
            intent_id: None,
        }
    }

    pub fn ping(direction: Direction) -> Self {
        Self {
            outcome: Outcome::Ignored,
            direction,
            event: None,
            reason: Some(IgnoreReason::Ping),
            intent_id: None,
        }
    }

    #[inline]
    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}

// ============================================================================
// Admin Responses
// ============================================================================

/// Intents whose mutation was started but never confirmed
#[derive(Debug, Clone, Serialize)]
pub struct PendingIntentsResponse {
    pub count: usize,
    pub intents: Vec<SyncIntent>,
}

impl From<Vec<SyncIntent>> for PendingIntentsResponse {
    fn from(intents: Vec<SyncIntent>) -> Self {
        Self {
            count: intents.len(),
            intents,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
