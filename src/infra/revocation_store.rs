use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use sha2::{Digest, Sha256};

use super::InfraError;
use crate::{
    app_error::{AppError, AppResult},
    use_cases::user::RevocationStore,
};

/// Redis-backed revocation list.
///
/// Each revoked token becomes one key carrying its own `EX`, so entries
/// disappear on their own once the token could no longer be used anyway.
#[derive(Clone)]
pub struct RedisRevocationStore {
    manager: ConnectionManager,
    prefix: String,
}

impl RedisRevocationStore {
    pub async fn new(redis_url: &str, prefix: &str) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;

        Ok(Self {
            manager,
            prefix: prefix.to_string(),
        })
    }

    fn key(&self, raw_token: &str) -> String {
        revocation_key(&self.prefix, raw_token)
    }
}

/// Tokens are digested so key length does not grow with claim size.
fn revocation_key(prefix: &str, raw_token: &str) -> String {
    let digest = Sha256::digest(raw_token.as_bytes());
    format!("{prefix}:revoked:{}", hex::encode(digest))
}

fn redis_error(err: redis::RedisError) -> AppError {
    tracing::error!(error = %err, "Redis error");
    AppError::Internal("Revocation store operation failed".into())
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn is_revoked(&self, raw_token: &str) -> AppResult<bool> {
        let mut conn = self.manager.clone();
        let revoked: bool = conn
            .exists(self.key(raw_token))
            .await
            .map_err(redis_error)?;
        Ok(revoked)
    }

    async fn revoke(&self, raw_token: &str, ttl_secs: i64) -> AppResult<()> {
        if ttl_secs <= 0 {
            return Ok(());
        }

        let mut conn = self.manager.clone();
        let _: () = conn
            .set_ex(self.key(raw_token), "1", ttl_secs as u64)
            .await
            .map_err(redis_error)?;

        Ok(())
    }
}
