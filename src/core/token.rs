//! Session token issuance and validation
//!
//! Tokens are HS256 JWTs carrying the user id as `sub` and an absolute `exp`.
//! There is no refresh and no revocation: expiry is the only lifecycle
//! control. The signing secret is injected at construction.

use crate::config::AuthConfig;
use crate::core::error::{AuthError, CatalogError, ConfigError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (epoch seconds)
    pub iat: i64,
    /// Expiration (epoch seconds)
    pub exp: i64,
}

/// A freshly signed token and the instant it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Stateless signer/verifier for session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> std::result::Result<Self, ConfigError> {
        let ttl = Duration::try_days(config.token_ttl_days)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "auth.token_ttl_days".to_string(),
                message: format!("{} days is not a usable token lifetime", config.token_ttl_days),
            })?;
        Ok(Self::new(&config.jwt_secret, ttl))
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime
    pub fn issue(&self, subject: Uuid) -> Result<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: Uuid, now: DateTime<Utc>) -> Result<IssuedToken> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            CatalogError::Internal(format!("token lifetime {} overflows the clock", self.ttl))
        })?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CatalogError::Internal(format!("Token creation failed: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token against the wall clock and return its subject
    pub fn validate(&self, token: &str) -> std::result::Result<Uuid, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`
    ///
    /// A token is rejected once `now` reaches its expiry instant.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller-supplied clock below.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= now.timestamp() {
            tracing::debug!(exp = claims.exp, "token expired");
            return Err(AuthError::InvalidToken);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
    }
}
