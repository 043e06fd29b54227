//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod issue;
mod sync_intent;

pub use comment::CommentTargetModel;
pub use issue::IssueModel;
pub use sync_intent::SyncIntentModel;
