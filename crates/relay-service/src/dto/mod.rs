//! Data transfer objects for the webhook ingress
//!
//! This module provides:
//! - Inbound webhook payloads and their conversion into sync events
//! - Response DTOs for serializing API outputs

pub mod responses;
pub mod webhook;

pub use responses::{
    ApiResponse, HealthChecks, HealthResponse, IgnoreReason, Outcome, PendingIntentsResponse,
    ReadinessResponse, SyncResponse,
};
pub use webhook::{
    ChangeFrom, ChangesPayload, CommentPayload, InstallationPayload, IssuePayload,
    RepositoryPayload, UserPayload, WebhookPayload,
};
