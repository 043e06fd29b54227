//! # relay-common
//!
//! Shared utilities: configuration, application errors, GitHub App
//! authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{AppClaims, AppJwtSigner};
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, GitHubApiConfig,
    GitHubAppConfig, HubConfig, RateLimitConfig, ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
