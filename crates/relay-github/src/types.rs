//! Wire types for the subset of the GitHub API the relay uses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use relay_core::entities::{Installation, InstallationToken, RemoteComment, RemoteIssue};
use relay_core::value_objects::IssueState;

#[derive(Debug, Deserialize)]
pub(crate) struct IssueResponse {
    pub id: i64,
    pub node_id: String,
    pub number: i64,
    pub title: String,
    pub state: IssueState,
}

impl From<IssueResponse> for RemoteIssue {
    fn from(r: IssueResponse) -> Self {
        RemoteIssue {
            id: r.id,
            node_id: r.node_id,
            number: r.number,
            title: r.title,
            state: r.state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentResponse {
    pub id: i64,
}

impl From<CommentResponse> for RemoteComment {
    fn from(r: CommentResponse) -> Self {
        RemoteComment { id: r.id }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountResponse {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstallationResponse {
    pub id: i64,
    pub account: Option<AccountResponse>,
}

impl InstallationResponse {
    /// Installations on deleted accounts carry no account
    pub fn into_installation(self) -> Option<Installation> {
        self.account.map(|account| Installation {
            id: self.id,
            account_login: account.login,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AccessTokenResponse> for InstallationToken {
    fn from(r: AccessTokenResponse) -> Self {
        InstallationToken {
            token: r.token,
            expires_at: r.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentBody<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest {
    pub query: &'static str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

/// Error body GitHub returns with 4xx/5xx
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}

pub(crate) const DELETE_ISSUE_MUTATION: &str =
    "mutation($issueId: ID!) { deleteIssue(input: {issueId: $issueId}) { clientMutationId } }";
