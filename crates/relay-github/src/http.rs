//! Shared HTTP plumbing for the GitHub clients

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use relay_common::GitHubApiConfig;
use relay_core::error::DomainError;
use relay_core::traits::TrackerResult;

use crate::types::ErrorResponse;

const API_VERSION: &str = "2022-11-28";
const MAX_ERROR_BODY: usize = 500;
/// REST base suffix used by GitHub Enterprise Server
const ENTERPRISE_REST_SUFFIX: &str = "/api/v3";

/// Pooled HTTP client bound to one API base URL
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GitHubHttp {
    client: Client,
    api_url: String,
    graphql_url: String,
}

impl GitHubHttp {
    /// Build a client with the GitHub media type, API version and a request timeout
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be built
    pub fn new(api_url: &str, timeout: Duration) -> TrackerResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("issue-relay"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| DomainError::InternalError(format!("failed to build HTTP client: {e}")))?;

        let api_url = api_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            graphql_url: graphql_endpoint(&api_url),
            api_url,
        })
    }

    /// Build from application config
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be built
    pub fn from_config(config: &GitHubApiConfig) -> TrackerResult<Self> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// GraphQL endpoint that pairs with the REST base URL
    pub(crate) fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Send a request and decode a JSON body from a 2xx response
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> TrackerResult<T> {
        let response = self.send(operation, request).await?;
        response.json::<T>().await.map_err(|e| {
            DomainError::transport(format!("failed to decode {operation} response: {e}"))
        })
    }

    /// Send a request and discard the body of a 2xx response
    pub(crate) async fn send_empty(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> TrackerResult<()> {
        self.send(operation, request).await.map(|_| ())
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> TrackerResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("{operation} request failed: {e}")))?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "GitHub API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = remote_message(&body);
        warn!(operation, status = status.as_u16(), %message, "GitHub API call failed");

        Err(DomainError::RemoteApi {
            status: status.as_u16(),
            message: format!("{operation}: {message}"),
        })
    }
}

/// `https://api.github.com` serves GraphQL at `/graphql`; Enterprise Server
/// serves REST at `/api/v3` and GraphQL at `/api/graphql`
fn graphql_endpoint(api_url: &str) -> String {
    match api_url.strip_suffix(ENTERPRISE_REST_SUFFIX) {
        Some(host) => format!("{host}/api/graphql"),
        None => format!("{api_url}/graphql"),
    }
}

/// Prefer GitHub's `message` field; fall back to a truncated raw body
fn remote_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.message;
    }
    if body.chars().count() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY).collect();
    format!("{truncated}...")
}
