//! # relay-github
//!
//! GitHub implementations of the tracker ports from `relay-core`:
//!
//! - [`GitHubAppClient`] authenticates as the app (JWT) to list installations
//!   and mint installation tokens.
//! - [`GitHubIssueClient`] acts with one installation token on issues and
//!   comments (REST), and deletes issues through GraphQL.
//!
//! Non-2xx responses become `DomainError::RemoteApi`. Nothing is retried.

mod app_client;
mod http;
mod issue_client;
mod types;

pub use app_client::GitHubAppClient;
pub use http::GitHubHttp;
pub use issue_client::GitHubIssueClient;
