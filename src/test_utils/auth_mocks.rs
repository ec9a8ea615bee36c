//! In-memory mock implementations of the credential and revocation stores.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::clock::Clock,
    domain::entities::user::{NewUser, User},
    use_cases::user::{RevocationStore, UserRepo},
};

// ============================================================================
// TestClock
// ============================================================================

/// Clock that only moves when told to.
pub struct TestClock {
    now: Mutex<i64>,
}

impl TestClock {
    pub fn at(unix_timestamp: i64) -> Self {
        Self {
            now: Mutex::new(unix_timestamp),
        }
    }

    pub fn set(&self, unix_timestamp: i64) {
        *self.now.lock().unwrap() = unix_timestamp;
    }

    pub fn advance(&self, secs: i64) {
        *self.now.lock().unwrap() += secs;
    }
}

impl Clock for TestClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(*self.now.lock().unwrap())
            .expect("test clock out of range")
    }
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

/// In-memory implementation of UserRepo for testing.
///
/// `create` checks and inserts under one lock, like a unique constraint.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: chrono::Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// UserRepo whose backing store is down.
pub struct UnavailableUserRepo;

#[async_trait]
impl UserRepo for UnavailableUserRepo {
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
        Err(AppError::Internal("Database operation failed".into()))
    }

    async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<User>> {
        Err(AppError::Internal("Database operation failed".into()))
    }

    async fn create(&self, _user: NewUser) -> AppResult<User> {
        Err(AppError::Internal("Database operation failed".into()))
    }
}

// ============================================================================
// InMemoryRevocationStore
// ============================================================================

/// In-memory implementation of RevocationStore for testing.
///
/// Entries expire against the shared test clock, like redis `EX`.
pub struct InMemoryRevocationStore {
    entries: Mutex<HashMap<String, i64>>,
    clock: Arc<TestClock>,
}

impl InMemoryRevocationStore {
    pub fn new(clock: Arc<TestClock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn expires_at(&self, raw_token: &str) -> Option<i64> {
        self.entries.lock().unwrap().get(raw_token).copied()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn is_revoked(&self, raw_token: &str) -> AppResult<bool> {
        let now = self.clock.unix_timestamp();
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(raw_token)
            .is_some_and(|expires_at| *expires_at > now))
    }

    async fn revoke(&self, raw_token: &str, ttl_secs: i64) -> AppResult<()> {
        if ttl_secs <= 0 {
            return Ok(());
        }
        let expires_at = self.clock.unix_timestamp() + ttl_secs;
        self.entries
            .lock()
            .unwrap()
            .insert(raw_token.to_string(), expires_at);
        Ok(())
    }
}

/// RevocationStore that never answers.
pub struct PendingRevocationStore;

#[async_trait]
impl RevocationStore for PendingRevocationStore {
    async fn is_revoked(&self, _raw_token: &str) -> AppResult<bool> {
        std::future::pending().await
    }

    async fn revoke(&self, _raw_token: &str, _ttl_secs: i64) -> AppResult<()> {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;

    #[tokio::test]
    async fn test_user_repo_find_by_email() {
        let user = create_test_user(|u| {
            u.email = "alice@example.com".to_string();
        });
        let user_id = user.id;

        let repo = InMemoryUserRepo::with_users(vec![user]);

        let found = repo.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user_id));
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_repo_duplicate_email_fails() {
        let repo = InMemoryUserRepo::new();
        let new_user = NewUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
        };

        let created = repo.create(new_user.clone()).await.unwrap();
        let result = repo.create(new_user).await;

        assert!(matches!(result, Err(AppError::EmailTaken)));
        assert_eq!(repo.find_by_id(created.id).await.unwrap().unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_revocation_store_expires_entries() {
        let clock = Arc::new(TestClock::at(1_000));
        let store = InMemoryRevocationStore::new(clock.clone());

        store.revoke("token", 10).await.unwrap();
        assert!(store.is_revoked("token").await.unwrap());

        clock.set(1_009);
        assert!(store.is_revoked("token").await.unwrap());

        clock.set(1_010);
        assert!(!store.is_revoked("token").await.unwrap());
    }

    #[tokio::test]
    async fn test_revocation_store_ignores_non_positive_ttl() {
        let store = InMemoryRevocationStore::new(Arc::new(TestClock::at(1_000)));

        store.revoke("zero", 0).await.unwrap();
        store.revoke("negative", -5).await.unwrap();

        assert_eq!(store.len(), 0);
        assert!(!store.is_revoked("zero").await.unwrap());
    }
}
