//! Issue mapping database model

use sqlx::FromRow;

/// Database model for the issues table
#[derive(Debug, Clone, FromRow)]
pub struct IssueModel {
    pub source_issue_id: i64,
    pub source_org: String,
    pub source_repo: String,
    pub source_issue_number: i64,
    pub author_login: String,
    pub title: String,
    pub body: String,
    pub state: String,
    pub hub_issue_number: i64,
}
