//! Builders wiring `AuthUseCases` and `AppState` to in-memory dependencies.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::{jwt::TokenCodec, password::PasswordHasher},
    infra::config::{AppConfig, LogFormat},
    test_utils::{InMemoryRevocationStore, InMemoryUserRepo, TestClock},
    use_cases::user::{AuthSettings, AuthUseCases, RevocationStore, UserRepo},
};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_TTL_SECS: i64 = 3600;
pub const TEST_NOW: i64 = 1_700_000_000;
/// bcrypt's minimum cost keeps the test suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        access_token_ttl: time::Duration::seconds(TEST_TTL_SECS),
        store_timeout: std::time::Duration::from_secs(5),
    }
}

pub fn test_codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(&SecretString::new(TEST_SECRET.into())))
}

pub fn test_hasher() -> Arc<PasswordHasher> {
    Arc::new(PasswordHasher::new(TEST_BCRYPT_COST).expect("valid test cost"))
}

pub fn build_use_cases(
    users: Arc<dyn UserRepo>,
    revocations: Arc<dyn RevocationStore>,
    clock: Arc<TestClock>,
) -> AuthUseCases {
    build_use_cases_with(users, revocations, clock, test_settings())
}

pub fn build_use_cases_with(
    users: Arc<dyn UserRepo>,
    revocations: Arc<dyn RevocationStore>,
    clock: Arc<TestClock>,
    settings: AuthSettings,
) -> AuthUseCases {
    AuthUseCases::new(
        users,
        revocations,
        test_hasher(),
        test_codec(),
        clock,
        settings,
    )
}

/// Use cases over fresh in-memory stores, with handles to inspect them.
pub struct TestAuth {
    pub use_cases: AuthUseCases,
    pub users: Arc<InMemoryUserRepo>,
    pub revocations: Arc<InMemoryRevocationStore>,
    pub clock: Arc<TestClock>,
    pub codec: Arc<TokenCodec>,
}

impl TestAuth {
    pub fn new() -> Self {
        let clock = Arc::new(TestClock::at(TEST_NOW));
        let users = Arc::new(InMemoryUserRepo::new());
        let revocations = Arc::new(InMemoryRevocationStore::new(clock.clone()));
        let use_cases = build_use_cases(users.clone(), revocations.clone(), clock.clone());

        Self {
            use_cases,
            users,
            revocations,
            clock,
            codec: test_codec(),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            config: Arc::new(test_app_config()),
            auth_use_cases: Arc::new(self.use_cases.clone()),
        }
    }
}

pub fn test_app_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new(TEST_SECRET.into()),
        access_token_ttl: time::Duration::seconds(TEST_TTL_SECS),
        bcrypt_cost: TEST_BCRYPT_COST,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://localhost/gatekeep_test".to_string(),
        redis_url: "redis://127.0.0.1:6379".to_string(),
        redis_key_prefix: "gatekeep-test".to_string(),
        store_timeout: std::time::Duration::from_secs(5),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        log_format: LogFormat::Pretty,
    }
}
