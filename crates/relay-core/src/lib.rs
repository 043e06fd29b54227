//! # relay-core
//!
//! Domain layer containing mapping entities, value objects, sync events, and the
//! ports (repository and tracker traits) the rest of the workspace implements.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CommentMapping, CommentTarget, Installation, InstallationToken, IntentStatus, IssueContent,
    IssueMapping, IssuePatch, RemoteComment, RemoteIssue, RepoRef, SourceIssueRef, SyncIntent,
};
pub use error::DomainError;
pub use events::{
    CommentEvent, CommentSnapshot, EditChanges, EventKind, IssueEvent, IssueSnapshot, SyncEvent,
};
pub use traits::{
    AppInstallations, CommentMappingRepository, IssueMappingRepository, IssueTracker, RepoResult,
    SyncIntentRepository, TrackerResult,
};
pub use value_objects::{Direction, IssueState, Side};
