//! Repository implementations
//!
//! PostgreSQL implementations of the identity store traits defined in relay-core.

mod comment_mapping;
pub(crate) mod error;
mod issue_mapping;
mod sync_intent;

pub use comment_mapping::PgCommentMappingRepository;
pub use issue_mapping::PgIssueMappingRepository;
pub use sync_intent::PgSyncIntentRepository;
