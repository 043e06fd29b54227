//! Repository traits (ports) - define the interface for the identity store
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    CommentMapping, CommentTarget, IssueContent, IssueMapping, SourceIssueRef, SyncIntent,
};
use crate::error::DomainError;
use crate::value_objects::{IssueState, Side};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Issue Mapping Repository
// ============================================================================

#[async_trait]
pub trait IssueMappingRepository: Send + Sync {
    /// Find mapping by the originating issue id
    async fn find_by_source(&self, source_issue_id: i64) -> RepoResult<Option<IssueMapping>>;

    /// Find mapping by the mirrored hub issue number
    async fn find_by_hub(&self, hub_issue_number: i64) -> RepoResult<Option<IssueMapping>>;

    /// Insert a new mapping; never overwrites an existing row
    async fn create(&self, mapping: &IssueMapping) -> RepoResult<()>;

    /// Overwrite author, title, body and state
    async fn update(&self, source_issue_id: i64, content: &IssueContent) -> RepoResult<()>;

    /// Overwrite only the state
    async fn set_state(&self, source_issue_id: i64, state: IssueState) -> RepoResult<()>;

    /// Remove the mapping and every comment mapping under it
    async fn delete(&self, source_issue_id: i64) -> RepoResult<()>;

    /// Hub issue number for a source issue
    async fn resolve_hub_issue(&self, source_issue_id: i64) -> RepoResult<i64> {
        self.find_by_source(source_issue_id)
            .await?
            .map(|m| m.hub_issue_number)
            .ok_or_else(|| DomainError::issue_not_found_by_source(source_issue_id))
    }

    /// Source coordinates for a hub issue number
    async fn resolve_source_issue(&self, hub_issue_number: i64) -> RepoResult<SourceIssueRef> {
        self.find_by_hub(hub_issue_number)
            .await?
            .map(|m| m.source_ref())
            .ok_or_else(|| DomainError::issue_not_found_by_hub(hub_issue_number))
    }
}

// ============================================================================
// Comment Mapping Repository
// ============================================================================

#[async_trait]
pub trait CommentMappingRepository: Send + Sync {
    /// Find a comment mapping by its id on the origin side, joined with its parent
    async fn find(&self, origin: Side, comment_id: i64) -> RepoResult<Option<CommentTarget>>;

    /// Insert a new mapping; the parent issue mapping must exist
    async fn create(&self, mapping: &CommentMapping) -> RepoResult<()>;

    /// Overwrite author and body
    async fn update(
        &self,
        origin: Side,
        comment_id: i64,
        author_login: &str,
        body: &str,
    ) -> RepoResult<()>;

    /// Remove a comment mapping
    async fn delete(&self, origin: Side, comment_id: i64) -> RepoResult<()>;

    /// Like [`find`](Self::find) but absence is an error
    async fn resolve(&self, origin: Side, comment_id: i64) -> RepoResult<CommentTarget> {
        self.find(origin, comment_id)
            .await?
            .ok_or(DomainError::CommentMappingNotFound {
                origin,
                id: comment_id,
            })
    }
}

// ============================================================================
// Sync Intent Repository
// ============================================================================

#[async_trait]
pub trait SyncIntentRepository: Send + Sync {
    /// Persist a pending intent
    async fn record(&self, intent: &SyncIntent) -> RepoResult<()>;

    /// Mark an intent as done
    async fn complete(&self, id: Uuid) -> RepoResult<()>;

    /// Intents still pending, oldest first
    async fn list_pending(&self, limit: i64) -> RepoResult<Vec<SyncIntent>>;
}
