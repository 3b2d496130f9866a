//! Signed session tokens.
//!
//! Login issues a compact signed token carrying the user identity; the API
//! middleware validates it on every request. Tokens are HS256-signed with a
//! configured secret and expire after a fixed number of hours.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to sign session token: {0}")]
    Signing(String),

    #[error("Session token has expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id).
    pub sub: String,
    /// Username at issue time.
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Unique token identifier.
    pub jti: String,
}

impl SessionClaims {
    /// The user id carried in the subject claim, if it parses.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Default session lifetime, matching the clinical workday-plus-margin the
/// service has always used.
pub const DEFAULT_EXPIRY_HOURS: i64 = 12;

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Signing and validation keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
    leeway_secs: u64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("expiry_hours", &self.expiry_hours)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

impl SessionKeys {
    /// Creates session keys from a shared secret.
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self::with_leeway(secret, expiry_hours, DEFAULT_LEEWAY_SECS)
    }

    /// Creates session keys with a custom clock-skew leeway.
    pub fn with_leeway(secret: &str, expiry_hours: i64, leeway_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
            leeway_secs,
        }
    }

    /// Issues a session token for the given user.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    /// Validates a token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })
    }
}
