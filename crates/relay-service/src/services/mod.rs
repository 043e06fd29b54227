//! Relay services
//!
//! This module contains the sync engine and the pieces it is built from:
//! the bot-loop filter, the per-app installation resolver and provenance
//! formatting.

pub mod bot_filter;
pub mod context;
pub mod error;
pub mod installation;
pub mod provenance;
pub mod sync;

pub use bot_filter::BotFilter;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use installation::InstallationResolver;
pub use sync::SyncService;
