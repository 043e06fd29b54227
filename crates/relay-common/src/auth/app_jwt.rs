//! GitHub App JWT signing
//!
//! App-level endpoints (listing installations, minting installation tokens)
//! authenticate with a short-lived RS256 JWT signed by the app's private key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Clock drift allowance applied to `iat`
const ISSUED_AT_SKEW_SECS: i64 = 60;
/// GitHub rejects app JWTs living longer than ten minutes
const TOKEN_LIFETIME_SECS: i64 = 540;

/// App JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppClaims {
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer (the app id)
    pub iss: String,
}

/// Signs app JWTs for one GitHub App
#[derive(Clone)]
pub struct AppJwtSigner {
    app_id: i64,
    encoding_key: EncodingKey,
}

impl AppJwtSigner {
    /// Create a signer from a base64-encoded PEM private key
    ///
    /// # Errors
    /// Returns an error if the key is not valid base64 or not an RSA PEM key
    pub fn from_base64(app_id: i64, encoded_key: &str) -> Result<Self, AppError> {
        let pem = STANDARD
            .decode(encoded_key.trim())
            .map_err(|e| AppError::Config(format!("app {app_id} private key is not base64: {e}")))?;
        Self::from_pem(app_id, &pem)
    }

    /// Create a signer from PEM bytes
    ///
    /// # Errors
    /// Returns an error if the key is not an RSA PEM key
    pub fn from_pem(app_id: i64, pem: &[u8]) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| AppError::Config(format!("app {app_id} private key is invalid: {e}")))?;
        Ok(Self {
            app_id,
            encoding_key,
        })
    }

    #[must_use]
    pub fn app_id(&self) -> i64 {
        self.app_id
    }

    /// Sign a fresh app JWT
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn sign(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AppClaims {
            iat: (now - Duration::seconds(ISSUED_AT_SKEW_SECS)).timestamp(),
            exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
            iss: self.app_id.to_string(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode app JWT")))
    }
}

impl std::fmt::Debug for AppJwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppJwtSigner")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const PRIVATE_KEY: &str = include_str!("../../testdata/app_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../testdata/app_key.pub.pem");

    #[test]
    fn test_sign_and_verify() {
        let signer = AppJwtSigner::from_pem(4242, PRIVATE_KEY.as_bytes()).unwrap();
        let token = signer.sign().unwrap();

        let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
        let data = decode::<AppClaims>(&token, &key, &Validation::new(Algorithm::RS256)).unwrap();

        assert_eq!(data.claims.iss, "4242");
        assert_eq!(data.claims.exp - data.claims.iat, 600);
        assert!(data.claims.iat < Utc::now().timestamp());
    }

    #[test]
    fn test_from_base64() {
        let encoded = STANDARD.encode(PRIVATE_KEY);
        let signer = AppJwtSigner::from_base64(7, &encoded).unwrap();
        assert_eq!(signer.app_id(), 7);
        assert!(signer.sign().is_ok());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(matches!(
            AppJwtSigner::from_base64(7, "%%% not base64"),
            Err(AppError::Config(_))
        ));
        let not_pem = STANDARD.encode("hello");
        assert!(matches!(
            AppJwtSigner::from_base64(7, &not_pem),
            Err(AppError::Config(_))
        ));
    }
}
