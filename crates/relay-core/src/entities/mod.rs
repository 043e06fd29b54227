//! Domain entities - mapping records and the tracker objects they point at

mod comment_mapping;
mod issue_mapping;
mod remote;
mod sync_intent;

pub use comment_mapping::{CommentMapping, CommentTarget};
pub use issue_mapping::{IssueContent, IssueMapping, SourceIssueRef};
pub use remote::{
    Installation, InstallationToken, IssuePatch, RemoteComment, RemoteIssue, RepoRef,
};
pub use sync_intent::{IntentStatus, SyncIntent};
