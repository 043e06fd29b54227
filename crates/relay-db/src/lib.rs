//! # relay-db
//!
//! Identity store: implements the repository traits from `relay-core` with
//! PostgreSQL via SQLx, plus an in-memory store used by tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_db::{create_pool, init_schema, DatabaseConfig, PgIssueMappingRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/relay")).await?;
//!     init_schema(&pool).await?;
//!     let issues = PgIssueMappingRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{
    PgCommentMappingRepository, PgIssueMappingRepository, PgSyncIntentRepository,
};
pub use schema::init_schema;
