//! # relay-service
//!
//! Application layer: turns classified webhook events into mirrored
//! mutations on the other organization and keeps the identity store in step.

pub mod dto;
pub mod services;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dto::{SyncResponse, WebhookPayload};
pub use services::{
    BotFilter, InstallationResolver, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SyncService,
};
