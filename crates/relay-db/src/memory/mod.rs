//! In-memory identity store
//!
//! Backs service and end-to-end tests, and local runs without PostgreSQL.
//! Enforces the same uniqueness, parent-existence and cascade rules as the
//! PostgreSQL schema.

mod store;

pub use store::{
    MemoryCommentMappingRepository, MemoryIssueMappingRepository, MemoryStore,
    MemorySyncIntentRepository,
};
