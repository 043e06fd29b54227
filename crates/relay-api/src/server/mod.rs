//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use relay_common::{AppConfig, AppError, AppJwtSigner, GitHubAppConfig};
use relay_core::entities::RepoRef;
use relay_core::traits::AppInstallations;
use relay_db::{
    create_pool, init_schema, PgCommentMappingRepository, PgIssueMappingRepository,
    PgSyncIntentRepository,
};
use relay_github::{GitHubAppClient, GitHubHttp};
use relay_service::{BotFilter, InstallationResolver, ServiceContextBuilder};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::middleware::{apply_middleware, IngressSettings};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState, settings: &IngressSettings) -> Router {
    let router = apply_middleware(create_router(), settings).merge(health_routes());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&relay_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    init_schema(&pool)
        .await
        .map_err(|e| AppError::Database(format!("schema bootstrap failed: {e}")))?;
    info!("PostgreSQL connection established");

    // GitHub apps share one HTTP connection pool
    let http = GitHubHttp::from_config(&config.github)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let source_app = app_client(&http, &config.source_app)?;
    let hub_app = app_client(&http, &config.hub_app)?;

    let excluded = config.excluded_installation_ids.clone();
    let source_installations = Arc::new(InstallationResolver::new(source_app, excluded.clone()));
    let hub_installations = Arc::new(InstallationResolver::new(hub_app, excluded));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .issue_repo(Arc::new(PgIssueMappingRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentMappingRepository::new(pool.clone())))
        .intent_repo(Arc::new(PgSyncIntentRepository::new(pool)))
        .source_installations(source_installations)
        .hub_installations(hub_installations)
        .bot_filter(BotFilter::new(
            &config.source_app.bot_login,
            &config.hub_app.bot_login,
        ))
        .hub_repo(RepoRef::new(&config.hub.org, &config.hub.repo))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context))
}

fn app_client(
    http: &GitHubHttp,
    app: &GitHubAppConfig,
) -> Result<Arc<dyn AppInstallations>, AppError> {
    let signer = AppJwtSigner::from_base64(app.app_id, &app.private_key)?;
    Ok(Arc::new(GitHubAppClient::new(http.clone(), signer)))
}

/// Run the HTTP server until SIGINT or SIGTERM, then drain in-flight requests
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let host: IpAddr = config.api.host.parse().map_err(|e| {
        AppError::Config(format!("Invalid API_HOST {}: {e}", config.api.host))
    })?;
    let addr = SocketAddr::new(host, config.api.port);

    // Create app state
    let state = create_app_state(&config).await?;
    let pool = state.service_context().pool().cloned();

    // Build application
    let app = create_app(state, &IngressSettings::from(&config));

    // Run server
    let result = run_server(app, addr).await;

    if let Some(pool) = pool {
        pool.close().await;
        info!("Database pool closed");
    }
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Error handling Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut handler) => {
                handler.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
    info!("Shutdown signal received, draining in-flight requests");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use relay_service::testing::{RelayFixture, TrackerCall};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(fx: &RelayFixture) -> Router {
        create_app(AppState::new(fx.ctx.clone()), &IngressSettings::default())
    }

    fn webhook(path: &str, event: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .header("x-github-event", event)
            .header("x-github-delivery", "d-1")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn opened() -> Value {
        json!({
            "action": "opened",
            "issue": {
                "id": 5001,
                "number": 7,
                "title": "Bug",
                "body": "It broke",
                "user": { "login": "alice" },
                "state": "open"
            },
            "repository": { "name": "widgets", "owner": { "login": "acme" } },
            "sender": { "login": "alice" }
        })
    }

    #[tokio::test]
    async fn test_source_webhook_mirrors_issue() {
        let fx = RelayFixture::new(&["acme"]);

        let response = app(&fx)
            .oneshot(webhook("/webhooks/source", "issues", &opened()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json_body(response).await;
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["event"], "issue.opened");
        assert!(matches!(
            fx.hub.calls().first(),
            Some(TrackerCall::CreateIssue { title, .. }) if title == "acme/widgets#7: Bug"
        ));
    }

    #[tokio::test]
    async fn test_ping_is_acknowledged() {
        let fx = RelayFixture::new(&["acme"]);

        let response = app(&fx)
            .oneshot(webhook("/webhooks/hub", "ping", &json!({ "zen": "Keep it simple." })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["reason"], "ping");
        assert_eq!(fx.tracker_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_deliveries_are_bad_requests() {
        let fx = RelayFixture::new(&["acme"]);

        let response = app(&fx)
            .oneshot(webhook("/webhooks/source", "pull_request", &opened()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "UNSUPPORTED_EVENT");

        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/source")
            .header("x-github-event", "issues")
            .body(Body::from("{\"action\": "))
            .unwrap();
        let response = app(&fx).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INVALID_EVENT");

        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/source")
            .body(Body::from(opened().to_string()))
            .unwrap();
        let response = app(&fx).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INVALID_HEADER");

        assert_eq!(fx.tracker_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_mapping_is_server_error() {
        let fx = RelayFixture::new(&["acme"]);
        let mut closed = opened();
        closed["action"] = json!("closed");

        let response = app(&fx)
            .oneshot(webhook("/webhooks/source", "issues", &closed))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "UNKNOWN_ISSUE_MAPPING");
    }

    #[tokio::test]
    async fn test_health_routes() {
        let fx = RelayFixture::new(&["acme"]);

        let response = app(&fx)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(&fx)
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["checks"]["database"], "healthy");
    }

    #[tokio::test]
    async fn test_pending_intents_listing() {
        let fx = RelayFixture::new(&["acme"]);
        fx.hub.fail_with(502);

        let response = app(&fx)
            .oneshot(webhook("/webhooks/source", "issues", &opened()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app(&fx)
            .oneshot(
                Request::get("/admin/intents/pending?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["intents"][0]["event"], "issue.opened");
        assert_eq!(body["intents"][0]["status"], "pending");
    }
}
