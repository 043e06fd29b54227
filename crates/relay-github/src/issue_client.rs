//! Installation-scoped issue and comment operations

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use relay_core::entities::{IssuePatch, RemoteComment, RemoteIssue, RepoRef};
use relay_core::error::DomainError;
use relay_core::traits::{IssueTracker, TrackerResult};

use crate::http::GitHubHttp;
use crate::types::{
    CommentBody, CommentResponse, CreateIssueRequest, GraphQlRequest, GraphQlResponse,
    IssueResponse, DELETE_ISSUE_MUTATION,
};

/// Issue tracker acting with one installation access token
pub struct GitHubIssueClient {
    http: GitHubHttp,
    token: String,
}

impl GitHubIssueClient {
    pub fn new(http: GitHubHttp, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }

    fn issues_path(repo: &RepoRef) -> String {
        format!("/repos/{}/{}/issues", repo.owner, repo.name)
    }
}

impl std::fmt::Debug for GitHubIssueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubIssueClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl IssueTracker for GitHubIssueClient {
    #[instrument(skip(self, title, body), fields(repo = %repo))]
    async fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> TrackerResult<RemoteIssue> {
        let request = self
            .http
            .client()
            .post(self.http.url(&Self::issues_path(repo)))
            .bearer_auth(&self.token)
            .json(&CreateIssueRequest { title, body });

        self.http
            .send_json::<IssueResponse>("create issue", request)
            .await
            .map(RemoteIssue::from)
    }

    #[instrument(skip(self, patch), fields(repo = %repo))]
    async fn edit_issue(
        &self,
        repo: &RepoRef,
        number: i64,
        patch: &IssuePatch,
    ) -> TrackerResult<RemoteIssue> {
        let request = self
            .http
            .client()
            .patch(self.http.url(&format!("{}/{number}", Self::issues_path(repo))))
            .bearer_auth(&self.token)
            .json(patch);

        self.http
            .send_json::<IssueResponse>("edit issue", request)
            .await
            .map(RemoteIssue::from)
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn get_issue(&self, repo: &RepoRef, number: i64) -> TrackerResult<RemoteIssue> {
        let request = self
            .http
            .client()
            .get(self.http.url(&format!("{}/{number}", Self::issues_path(repo))))
            .bearer_auth(&self.token);

        self.http
            .send_json::<IssueResponse>("get issue", request)
            .await
            .map(RemoteIssue::from)
    }

    #[instrument(skip(self))]
    async fn delete_issue(&self, node_id: &str) -> TrackerResult<()> {
        let request = self
            .http
            .client()
            .post(self.http.graphql_url())
            .bearer_auth(&self.token)
            .json(&GraphQlRequest {
                query: DELETE_ISSUE_MUTATION,
                variables: json!({ "issueId": node_id }),
            });

        let response: GraphQlResponse = self.http.send_json("delete issue", request).await?;
        if response.errors.is_empty() {
            return Ok(());
        }

        let message = response
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        Err(DomainError::RemoteApi {
            status: 200,
            message: format!("delete issue: {message}"),
        })
    }

    #[instrument(skip(self, body), fields(repo = %repo))]
    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: i64,
        body: &str,
    ) -> TrackerResult<RemoteComment> {
        let request = self
            .http
            .client()
            .post(self.http.url(&format!(
                "{}/{issue_number}/comments",
                Self::issues_path(repo)
            )))
            .bearer_auth(&self.token)
            .json(&CommentBody { body });

        self.http
            .send_json::<CommentResponse>("create comment", request)
            .await
            .map(RemoteComment::from)
    }

    #[instrument(skip(self, body), fields(repo = %repo))]
    async fn edit_comment(
        &self,
        repo: &RepoRef,
        comment_id: i64,
        body: &str,
    ) -> TrackerResult<RemoteComment> {
        let request = self
            .http
            .client()
            .patch(self.http.url(&format!(
                "{}/comments/{comment_id}",
                Self::issues_path(repo)
            )))
            .bearer_auth(&self.token)
            .json(&CommentBody { body });

        self.http
            .send_json::<CommentResponse>("edit comment", request)
            .await
            .map(RemoteComment::from)
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn delete_comment(&self, repo: &RepoRef, comment_id: i64) -> TrackerResult<()> {
        let request = self
            .http
            .client()
            .delete(self.http.url(&format!(
                "{}/comments/{comment_id}",
                Self::issues_path(repo)
            )))
            .bearer_auth(&self.token);

        self.http.send_empty("delete comment", request).await
    }
}
