use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::users::{self, Roles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's UUID.
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: usize,
    /// Issued-at (Unix timestamp).
    pub iat: usize,
    /// Unique token id, used to revoke refresh tokens on logout.
    pub jti: String,
    pub token_type: TokenType,
    pub role: Roles,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// Seconds until expiry, never negative.
    pub fn remaining_secs(&self, now: usize) -> u64 {
        self.exp.saturating_sub(now) as u64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies the API's HS256 tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn issue(&self, user: &users::Model, token_type: TokenType) -> Result<String, String> {
        let now = chrono::Utc::now().timestamp() as usize;
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user.id.to_string(),
            exp: now + ttl.as_secs() as usize,
            iat: now,
            jti: Uuid::new_v4().to_string(),
            token_type,
            role: user.role,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| format!("Failed to sign token: {e}"))
    }

    pub fn issue_pair(&self, user: &users::Model) -> Result<TokenPair, String> {
        Ok(TokenPair {
            access: self.issue(user, TokenType::Access)?,
            refresh: self.issue(user, TokenType::Refresh)?,
        })
    }

    /// Validate the signature and expiry, then require the expected token type.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, String> {
        let claims = validate_token(token, &self.secret)?;
        if claims.token_type != expected {
            return Err(format!("Expected a {expected:?} token"));
        }
        Ok(claims)
    }
}

/// Validate an HS256 token and return the decoded claims.
///
/// Errors are the jsonwebtoken error kind (e.g. `ExpiredSignature`).
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("{:?}", e.kind()))
}
