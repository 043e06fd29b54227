//! Comment mapping database models
//!
//! `comments` and `synced_comments` share one column layout.

use sqlx::FromRow;

/// A comment row joined with its parent issue row
#[derive(Debug, Clone, FromRow)]
pub struct CommentTargetModel {
    pub source_comment_id: i64,
    pub hub_comment_id: i64,
    pub parent_issue_id: i64,
    pub author_login: String,
    pub body: String,

    pub issue_source_org: String,
    pub issue_source_repo: String,
    pub issue_source_issue_number: i64,
    pub issue_author_login: String,
    pub issue_title: String,
    pub issue_body: String,
    pub issue_state: String,
    pub issue_hub_issue_number: i64,
}
