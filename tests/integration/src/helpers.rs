//! Test helpers for integration tests
//!
//! Provides a server bound to an ephemeral port and request helpers that
//! speak the webhook delivery protocol.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use relay_api::{create_app, AppState, IngressSettings};
use relay_service::testing::RelayFixture;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static DELIVERY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub fixture: RelayFixture,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the source app installed on `source_orgs`
    pub async fn start(source_orgs: &[&str]) -> Result<Self> {
        let fixture = RelayFixture::new(source_orgs);
        let app = create_app(
            AppState::new(fixture.ctx.clone()),
            &IngressSettings::default(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            fixture,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Deliver a webhook with the given event type header
    pub async fn post_webhook<T: Serialize>(
        &self,
        path: &str,
        event: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let delivery = DELIVERY_COUNTER.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .client
            .post(&url)
            .header("X-GitHub-Event", event)
            .header("X-GitHub-Delivery", format!("delivery-{delivery}"))
            .json(body)
            .send()
            .await?)
    }

    /// Deliver a source-side webhook
    pub async fn source_webhook<T: Serialize>(&self, event: &str, body: &T) -> Result<Response> {
        self.post_webhook("/webhooks/source", event, body).await
    }

    /// Deliver a hub-side webhook
    pub async fn hub_webhook<T: Serialize>(&self, event: &str, body: &T) -> Result<Response> {
        self.post_webhook("/webhooks/hub", event, body).await
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
