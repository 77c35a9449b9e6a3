// JWT token generation and validation service

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signing secret, with the original deployment's development fallback.
/// The fallback is loud: production deployments must set JWT_SECRET.
pub(crate) fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET is not set; falling back to the built-in development secret");
        "your-secret-jwt-key-change-this-in-production".to_string()
    })
}

/// Token service for issuing and verifying bearer tokens.
///
/// One expiry policy for both principal kinds: 24 hours.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: String,
    token_duration: i64, // seconds
}

impl TokenService {
    const TOKEN_DURATION_SECS: i64 = 86_400;

    pub fn new(secret: String) -> Self {
        Self {
            secret,
            token_duration: Self::TOKEN_DURATION_SECS,
        }
    }

    /// Construct from the JWT_SECRET environment variable.
    pub fn from_env() -> Self {
        Self::new(jwt_secret())
    }

    /// Issue a signed token for a principal.
    pub fn generate_token(&self, principal_id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal_id,
            role,
            iat: now,
            exp: now + self.token_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}
