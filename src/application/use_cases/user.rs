use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{clock::Clock, jwt::TokenCodec, password::PasswordHasher},
    domain::entities::user::{NewUser, User, normalize_email},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    /// Fails with [`AppError::EmailTaken`] if the email is already stored.
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Absent and expired entries both read as not revoked.
    async fn is_revoked(&self, raw_token: &str) -> AppResult<bool>;
    /// Records `raw_token` for `ttl_secs`. Non-positive TTLs are ignored.
    async fn revoke(&self, raw_token: &str, ttl_secs: i64) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user: UserProfile,
    pub access_token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub access_token_ttl: time::Duration,
    /// Upper bound for a single credential or revocation store call.
    pub store_timeout: std::time::Duration,
}

#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    revocations: Arc<dyn RevocationStore>,
    hasher: Arc<PasswordHasher>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
    settings: AuthSettings,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepo>,
        revocations: Arc<dyn RevocationStore>,
        hasher: Arc<PasswordHasher>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            revocations,
            hasher,
            codec,
            clock,
            settings,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<UserProfile> {
        let email = normalize_email(email);

        // Fast path only; the store's unique constraint settles races.
        if self
            .bounded("find_by_email", self.users.find_by_email(&email))
            .await?
            .is_some()
        {
            tracing::info!("Registration rejected, email already registered");
            return Err(AppError::EmailTaken);
        }

        let hasher = self.hasher.clone();
        let plaintext = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await??;

        let user = self
            .bounded(
                "create",
                self.users.create(NewUser {
                    name: name.trim().to_string(),
                    email,
                    password_hash,
                }),
            )
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Unknown emails and wrong passwords both yield
    /// [`AppError::InvalidCredentials`] after the same amount of hashing work.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let email = normalize_email(email);
        let found = self
            .bounded("find_by_email", self.users.find_by_email(&email))
            .await?;

        let hasher = self.hasher.clone();
        let plaintext = password.to_owned();
        let verified = tokio::task::spawn_blocking(move || match found {
            Some(user) if hasher.verify(&user.password_hash, &plaintext) => Some(user),
            Some(_) => None,
            None => {
                hasher.verify_dummy(&plaintext);
                None
            }
        })
        .await?;

        let Some(user) = verified else {
            tracing::info!("Authentication failed");
            return Err(AppError::InvalidCredentials);
        };

        let issued = self.codec.issue(
            user.id,
            &user.email,
            self.settings.access_token_ttl,
            self.clock.now(),
        )?;

        tracing::info!(user_id = %user.id, expires_at = issued.expires_at, "Access token issued");
        Ok(AuthenticatedUser {
            user: user.into(),
            access_token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Stateless checks (signature, claims, expiry) run before any store
    /// round-trip. A token is still valid during the second equal to `exp`.
    ///
    /// Revocation is eventually consistent: a call that read the revocation
    /// store before a concurrent `revoke` finished may still succeed.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, raw_token: &str) -> AppResult<UserProfile> {
        let claims = self.codec.decode(raw_token).map_err(|reason| {
            tracing::debug!(%reason, "Rejected access token");
            AppError::from(reason)
        })?;

        let now = self.clock.unix_timestamp();
        if now > claims.exp {
            tracing::debug!(user_id = %claims.sub, exp = claims.exp, now, "Rejected expired access token");
            return Err(AppError::ExpiredToken);
        }

        let user = self
            .bounded("find_by_id", self.users.find_by_id(claims.sub))
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.sub, "Access token subject no longer exists");
                AppError::InvalidToken
            })?;

        if user.email != claims.email {
            tracing::warn!(user_id = %user.id, "Access token email does not match user");
            return Err(AppError::InvalidToken);
        }

        if self
            .bounded("is_revoked", self.revocations.is_revoked(raw_token))
            .await?
        {
            tracing::debug!(user_id = %user.id, "Rejected revoked access token");
            return Err(AppError::RevokedToken);
        }

        Ok(user.into())
    }

    /// Tokens that do not decode, or are already past expiry, need no entry.
    #[instrument(skip_all)]
    pub async fn revoke(&self, raw_token: &str) -> AppResult<()> {
        let claims = match self.codec.decode(raw_token) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::debug!(%reason, "Ignoring revocation of undecodable token");
                return Ok(());
            }
        };

        // +1 keeps the entry alive through the second equal to `exp`.
        let ttl_secs = claims.exp - self.clock.unix_timestamp() + 1;
        if ttl_secs <= 0 {
            tracing::debug!(user_id = %claims.sub, "Ignoring revocation of expired token");
            return Ok(());
        }

        self.bounded("revoke", self.revocations.revoke(raw_token, ttl_secs))
            .await?;

        tracing::info!(user_id = %claims.sub, ttl_secs, "Access token revoked");
        Ok(())
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        tokio::time::timeout(self.settings.store_timeout, call)
            .await
            .unwrap_or_else(|_| {
                tracing::error!(
                    operation,
                    timeout_ms = self.settings.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(AppError::Internal("Store call timed out".into()))
            })
    }
}
