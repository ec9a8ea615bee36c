use crate::{
    adapters::http::app_state::AppState,
    application::{clock::SystemClock, jwt::TokenCodec, password::PasswordHasher},
    infra::{
        InfraError,
        config::{AppConfig, LogFormat},
        postgres_persistence,
        revocation_store::RedisRevocationStore,
    },
    use_cases::user::{AuthSettings, AuthUseCases, RevocationStore, UserRepo},
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let revocations =
        Arc::new(RedisRevocationStore::new(&config.redis_url, &config.redis_key_prefix).await?);

    let hasher = Arc::new(PasswordHasher::new(config.bcrypt_cost).map_err(InfraError::HasherInit)?);
    let codec = Arc::new(TokenCodec::new(&config.jwt_secret));

    let auth_use_cases = AuthUseCases::new(
        postgres_arc as Arc<dyn UserRepo>,
        revocations as Arc<dyn RevocationStore>,
        hasher,
        codec,
        Arc::new(SystemClock),
        AuthSettings {
            access_token_ttl: config.access_token_ttl,
            store_timeout: config.store_timeout,
        },
    );

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
    })
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gatekeep=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(false) // don't show target (module path)
                    .with_level(true)
                    .pretty(),
            )
            .try_init()
            .ok(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .ok(),
    };
}
