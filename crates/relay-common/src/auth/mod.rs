//! GitHub App authentication

mod app_jwt;

pub use app_jwt::{AppClaims, AppJwtSigner};
