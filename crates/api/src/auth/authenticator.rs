//! Per-request token validation with silent rotation.
//!
//! [`TokenAuthenticator::authenticate`] walks the following states in order:
//!
//! 1. No tokens at all: anonymous.
//! 2. The access token verifies: authenticated as its subject.
//! 3. The access token is missing or invalid and there is no refresh token:
//!    anonymous.
//! 4. The refresh token fails to verify, or its user no longer exists:
//!    anonymous.
//! 5. Otherwise a fresh pair is minted for the refresh token's user and the
//!    request is authenticated as that user.
//!
//! Any verification error is treated as if the token were absent. Nothing in
//! here ever rejects a request.

use std::sync::Arc;

use bugboard_core::types::DbId;
use bugboard_db::Store;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, validate_access_token,
    validate_refresh_token, JwtConfig,
};

/// A freshly minted access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of authenticating one request.
#[derive(Debug, Clone, Default)]
pub struct Authentication {
    pub user_id: Option<DbId>,
    /// Set when the refresh token was used; the caller must send these
    /// back as cookies.
    pub rotated: Option<TokenPair>,
}

impl Authentication {
    fn anonymous() -> Self {
        Self::default()
    }
}

pub struct TokenAuthenticator {
    store: Arc<dyn Store>,
    config: JwtConfig,
}

impl TokenAuthenticator {
    pub fn new(store: Arc<dyn Store>, config: JwtConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Mint a new token pair for `user_id`.
    pub fn issue(&self, user_id: DbId) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: generate_access_token(user_id, &self.config)?,
            refresh_token: generate_refresh_token(user_id, &self.config)?,
        })
    }

    /// Resolve the acting user from the request's cookies.
    pub async fn authenticate(&self, access: Option<&str>, refresh: Option<&str>) -> Authentication {
        if let Some(token) = access {
            match validate_access_token(token, &self.config) {
                Ok(claims) => {
                    return Authentication {
                        user_id: Some(claims.sub),
                        rotated: None,
                    }
                }
                Err(e) => tracing::debug!(error = %e, "Access token rejected"),
            }
        }

        let Some(token) = refresh else {
            return Authentication::anonymous();
        };

        let claims = match validate_refresh_token(token, &self.config) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Refresh token rejected");
                return Authentication::anonymous();
            }
        };

        match self.store.get_user(claims.sub).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(user_id = claims.sub, "Refresh token for unknown user");
                return Authentication::anonymous();
            }
            Err(e) => {
                tracing::warn!(user_id = claims.sub, error = %e, "User lookup failed during refresh");
                return Authentication::anonymous();
            }
        }

        match self.issue(claims.sub) {
            Ok(pair) => {
                tracing::debug!(user_id = claims.sub, "Session tokens rotated");
                Authentication {
                    user_id: Some(claims.sub),
                    rotated: Some(pair),
                }
            }
            Err(e) => {
                tracing::error!(user_id = claims.sub, error = %e, "Failed to mint rotated tokens");
                Authentication::anonymous()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bugboard_db::models::user::CreateUser;
    use bugboard_db::MemoryStore;

    use super::*;
    use crate::auth::jwt::tests::{expired_token, test_config};

    async fn setup() -> (TokenAuthenticator, DbId) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let user = store
            .create_user(&CreateUser {
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                email: "ann@test.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        (TokenAuthenticator::new(store, test_config()), user.id)
    }

    #[tokio::test]
    async fn no_tokens_is_anonymous() {
        let (auth, _) = setup().await;
        let result = auth.authenticate(None, None).await;
        assert_eq!(result.user_id, None);
        assert!(result.rotated.is_none());
    }

    #[tokio::test]
    async fn valid_access_token_authenticates_without_rotation() {
        let (auth, user_id) = setup().await;
        let pair = auth.issue(user_id).unwrap();

        let result = auth
            .authenticate(Some(&pair.access_token), Some(&pair.refresh_token))
            .await;

        assert_eq!(result.user_id, Some(user_id));
        assert!(result.rotated.is_none());
    }

    #[tokio::test]
    async fn invalid_access_without_refresh_is_anonymous() {
        let (auth, _) = setup().await;
        let result = auth.authenticate(Some("garbage"), None).await;
        assert_eq!(result.user_id, None);
        assert!(result.rotated.is_none());
    }

    #[tokio::test]
    async fn expired_access_with_valid_refresh_rotates() {
        let (auth, user_id) = setup().await;
        let expired = expired_token(user_id, &auth.config().access_secret);
        let refresh = generate_refresh_token(user_id, auth.config()).unwrap();

        let result = auth.authenticate(Some(&expired), Some(&refresh)).await;

        assert_eq!(result.user_id, Some(user_id));
        let pair = result.rotated.expect("pair should rotate");
        let claims = validate_access_token(&pair.access_token, auth.config()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_ne!(pair.refresh_token, refresh);
    }

    #[tokio::test]
    async fn missing_access_with_valid_refresh_rotates() {
        let (auth, user_id) = setup().await;
        let refresh = generate_refresh_token(user_id, auth.config()).unwrap();

        let result = auth.authenticate(None, Some(&refresh)).await;

        assert_eq!(result.user_id, Some(user_id));
        assert!(result.rotated.is_some());
    }

    #[tokio::test]
    async fn both_invalid_is_anonymous() {
        let (auth, user_id) = setup().await;
        let expired_refresh = expired_token(user_id, &auth.config().refresh_secret);

        let result = auth
            .authenticate(Some("garbage"), Some(&expired_refresh))
            .await;

        assert_eq!(result.user_id, None);
        assert!(result.rotated.is_none());
    }

    #[tokio::test]
    async fn refresh_for_deleted_user_is_anonymous() {
        let (auth, _) = setup().await;
        let refresh = generate_refresh_token(999, auth.config()).unwrap();

        let result = auth.authenticate(None, Some(&refresh)).await;

        assert_eq!(result.user_id, None);
        assert!(result.rotated.is_none());
    }

    #[tokio::test]
    async fn access_token_is_not_accepted_as_refresh() {
        let (auth, user_id) = setup().await;
        let access = generate_access_token(user_id, auth.config()).unwrap();

        let result = auth.authenticate(None, Some(&access)).await;

        assert_eq!(result.user_id, None);
    }
}
