//! JWT token generation and validation
//!
//! Tokens are HS256-signed and carry the user id in `sub`. Expiry is checked
//! against a caller-supplied clock so it can be exercised deterministically.

use crate::config::MAX_TOKEN_EXPIRY_SECS;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use todo_shared::errors::AuthError;
use tracing::debug;
use uuid::Uuid;

/// The only algorithm tokens are signed with or accepted under
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed JWT keys, derived once at startup
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    token_expiry_secs: i64,
}

impl JwtService {
    /// Create the service; an empty secret is a startup error
    pub fn new(secret: &str, token_expiry_secs: i64) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("JWT signing secret must not be empty");
        }
        if token_expiry_secs <= 0 || token_expiry_secs > MAX_TOKEN_EXPIRY_SECS {
            anyhow::bail!(
                "JWT token expiry must be between 1 and {} seconds",
                MAX_TOKEN_EXPIRY_SECS
            );
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // exp is compared against the caller's clock in `verify`
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            token_expiry_secs,
        })
    }

    /// Issue a token for `user_id`, valid until `now + expiry`
    pub fn issue(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String> {
        let expires_at = now
            .checked_add_signed(Duration::seconds(self.token_expiry_secs))
            .context("token expiry overflows the clock")?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    #[inline]
    pub fn issue_now(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, Utc::now())
    }

    /// Verify a token and return the user id it was issued for
    ///
    /// Signature, algorithm and claim-shape failures are all `MalformedToken`;
    /// a valid token past its `exp` is `TokenExpired`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token failed decoding");
                AuthError::MalformedToken
            })?;

        let claims = token_data.claims;
        if now.timestamp() > claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedToken)
    }

    #[inline]
    pub fn verify_now(&self, token: &str) -> Result<Uuid, AuthError> {
        self.verify(token, Utc::now())
    }

    #[inline]
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }
}
