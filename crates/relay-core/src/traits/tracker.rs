//! Tracker ports - the remote issue tracker as seen by the sync engine

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{
    Installation, InstallationToken, IssuePatch, RemoteComment, RemoteIssue, RepoRef,
};
use crate::error::DomainError;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, DomainError>;

/// Issue and comment operations performed with one installation's credentials
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str)
        -> TrackerResult<RemoteIssue>;

    async fn edit_issue(
        &self,
        repo: &RepoRef,
        number: i64,
        patch: &IssuePatch,
    ) -> TrackerResult<RemoteIssue>;

    async fn get_issue(&self, repo: &RepoRef, number: i64) -> TrackerResult<RemoteIssue>;

    /// Delete an issue by its node id
    async fn delete_issue(&self, node_id: &str) -> TrackerResult<()>;

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: i64,
        body: &str,
    ) -> TrackerResult<RemoteComment>;

    async fn edit_comment(
        &self,
        repo: &RepoRef,
        comment_id: i64,
        body: &str,
    ) -> TrackerResult<RemoteComment>;

    async fn delete_comment(&self, repo: &RepoRef, comment_id: i64) -> TrackerResult<()>;
}

/// App-level operations, authenticated as the app itself
#[async_trait]
pub trait AppInstallations: Send + Sync {
    /// One page of the app's installations (1-based)
    async fn list_installations(&self, page: u32, per_page: u32)
        -> TrackerResult<Vec<Installation>>;

    /// Mint an installation-scoped token
    async fn create_installation_token(
        &self,
        installation_id: i64,
    ) -> TrackerResult<InstallationToken>;

    /// Build a tracker acting with the given token
    fn issue_tracker(&self, token: &InstallationToken) -> TrackerResult<Arc<dyn IssueTracker>>;
}
