//! Access and refresh token generation and validation.
//!
//! Both tokens are HS256-signed JWTs carrying the same [`Claims`] shape. They
//! are signed with two different secrets so one can never stand in for the
//! other.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use bugboard_core::types::DbId;

/// Access token lifetime: one hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
/// Refresh token lifetime: seven days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT claims embedded in both tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4), so two pairs minted in the same
    /// second still differ.
    pub jti: String,
}

/// Secrets and cookie flags for session tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// HMAC secret for refresh tokens.
    pub refresh_secret: String,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`  | **yes**  | --      |
    /// | `REFRESH_TOKEN_SECRET` | **yes**  | --      |
    /// | `COOKIE_SECURE`        | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if either secret is missing or empty, or if both are equal.
    pub fn from_env() -> Self {
        let access_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in the environment");
        assert!(!access_secret.is_empty(), "ACCESS_TOKEN_SECRET must not be empty");

        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .expect("REFRESH_TOKEN_SECRET must be set in the environment");
        assert!(!refresh_secret.is_empty(), "REFRESH_TOKEN_SECRET must not be empty");

        assert_ne!(
            access_secret, refresh_secret,
            "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ"
        );

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be true or false");

        Self {
            access_secret,
            refresh_secret,
            cookie_secure,
        }
    }
}

fn sign(user_id: DbId, ttl_secs: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + ttl_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Generate a one-hour access token for `user_id`.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    sign(user_id, ACCESS_TOKEN_TTL_SECS, &config.access_secret)
}

/// Generate a seven-day refresh token for `user_id`.
pub fn generate_refresh_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    sign(user_id, REFRESH_TOKEN_TTL_SECS, &config.refresh_secret)
}

/// Validate an access token, returning its [`Claims`].
pub fn validate_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    verify(token, &config.access_secret)
}

/// Validate a refresh token, returning its [`Claims`].
pub fn validate_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    verify(token, &config.refresh_secret)
}
