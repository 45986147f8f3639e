//! Token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the user's id and username. Keys are
//! derived once from the configured secret and shared via `Arc`.

use bloglist_shared::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID; a token without it does not verify
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp), absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Pre-computed signing keys
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and verifies bearer tokens
///
/// Cheap to clone; build one at startup and keep it in `AppState`.
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    expiry_secs: Option<i64>,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Create a token service. With `expiry_secs = None` tokens carry no
    /// `exp` claim and stay valid until the secret changes.
    pub fn new(secret: &str, expiry_secs: Option<i64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match expiry_secs {
            Some(_) => validation.set_required_spec_claims(&["exp"]),
            None => {
                validation.validate_exp = false;
                validation.required_spec_claims.clear();
            }
        }

        Self {
            keys: TokenKeys::new(secret),
            expiry_secs,
            validation: Arc::new(validation),
        }
    }

    /// Sign a token for a user
    pub fn issue(&self, user_id: Uuid, username: &str) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: self
                .expiry_secs
                .map(|secs| (now + Duration::seconds(secs)).timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Check a token's signature (and expiry, when enabled) and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}
