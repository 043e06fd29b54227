//! Middleware stack for the API server
//!
//! Provides request ID generation, tracing, timeouts and rate limiting.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use relay_common::{AppConfig, RateLimitConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ingress limits applied around the routes
#[derive(Debug, Clone)]
pub struct IngressSettings {
    /// Requests running longer are answered with 503
    pub request_timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl Default for IngressSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            rate_limit: RateLimitConfig {
                requests_per_second: 10,
                burst: 50,
            },
        }
    }
}

impl From<&AppConfig> for IngressSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.api.request_timeout_secs),
            rate_limit: config.rate_limit.clone(),
        }
    }
}

/// Apply middleware stack to the router
///
/// Order seen by a request: rate limit, request id, trace, timeout, handler.
pub fn apply_middleware(router: Router<AppState>, settings: &IngressSettings) -> Router<AppState> {
    let router = router
        // Timeout (returns 503 Service Unavailable on timeout)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            settings.request_timeout,
        ))
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Request ID propagation
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID generation
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ));

    // Rate limiting (outermost); global rather than per-IP, deliveries all come from GitHub
    let replenish_ms = 1000 / u64::from(settings.rate_limit.requests_per_second.max(1));
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms.max(1))
        .burst_size(settings.rate_limit.burst.max(1))
        .key_extractor(GlobalKeyExtractor)
        .finish();

    match governor_conf {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            warn!("Invalid rate limit configuration; serving without a rate limiter");
            router
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = IngressSettings::default();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.rate_limit.requests_per_second, 10);
        assert_eq!(settings.rate_limit.burst, 50);
    }
}
