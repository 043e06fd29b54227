//! App-authenticated operations

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use relay_common::AppJwtSigner;
use relay_core::entities::{Installation, InstallationToken};
use relay_core::error::DomainError;
use relay_core::traits::{AppInstallations, IssueTracker, TrackerResult};

use crate::http::GitHubHttp;
use crate::issue_client::GitHubIssueClient;
use crate::types::{AccessTokenResponse, InstallationResponse};

/// One GitHub App, authenticated with its signed JWT
#[derive(Debug, Clone)]
pub struct GitHubAppClient {
    http: GitHubHttp,
    signer: AppJwtSigner,
}

impl GitHubAppClient {
    pub fn new(http: GitHubHttp, signer: AppJwtSigner) -> Self {
        Self { http, signer }
    }

    fn app_jwt(&self) -> TrackerResult<String> {
        self.signer
            .sign()
            .map_err(|e| DomainError::InternalError(format!("app JWT: {e}")))
    }
}

#[async_trait]
impl AppInstallations for GitHubAppClient {
    #[instrument(skip(self), fields(app_id = self.signer.app_id()))]
    async fn list_installations(
        &self,
        page: u32,
        per_page: u32,
    ) -> TrackerResult<Vec<Installation>> {
        let request = self
            .http
            .client()
            .get(self.http.url("/app/installations"))
            .bearer_auth(self.app_jwt()?)
            .query(&[("per_page", per_page), ("page", page)]);

        let installations: Vec<InstallationResponse> =
            self.http.send_json("list installations", request).await?;

        Ok(installations
            .into_iter()
            .filter_map(InstallationResponse::into_installation)
            .collect())
    }

    #[instrument(skip(self), fields(app_id = self.signer.app_id()))]
    async fn create_installation_token(
        &self,
        installation_id: i64,
    ) -> TrackerResult<InstallationToken> {
        let request = self
            .http
            .client()
            .post(self.http.url(&format!(
                "/app/installations/{installation_id}/access_tokens"
            )))
            .bearer_auth(self.app_jwt()?);

        self.http
            .send_json::<AccessTokenResponse>("create installation token", request)
            .await
            .map(InstallationToken::from)
    }

    fn issue_tracker(&self, token: &InstallationToken) -> TrackerResult<Arc<dyn IssueTracker>> {
        Ok(Arc::new(GitHubIssueClient::new(
            self.http.clone(),
            token.token.clone(),
        )))
    }
}
