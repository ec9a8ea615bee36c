use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;

use crate::application::password::DEFAULT_COST;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    /// bcrypt work factor; changing it only affects newly hashed passwords.
    pub bcrypt_cost: u32,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,
    /// Namespace prepended to every redis key.
    pub redis_key_prefix: String,
    /// Upper bound for a single postgres or redis call made while serving a request.
    pub store_timeout: std::time::Duration,
    pub cors_origin: HeaderValue,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let access_token_ttl_secs: i64 = get_env_default("ACCESS_TOKEN_TTL_SECS", 3_600);
        let bcrypt_cost: u32 = get_env_default("BCRYPT_COST", DEFAULT_COST);

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let redis_key_prefix: String = get_env_default("REDIS_KEY_PREFIX", "gatekeep".to_string());
        let store_timeout_ms: u64 = get_env_default("STORE_TIMEOUT_MS", 2_000);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let log_format = LogFormat::from_raw(&get_env_default("LOG_FORMAT", String::from("pretty")));

        Self {
            jwt_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            bcrypt_cost,
            bind_addr,
            database_url,
            redis_url,
            redis_key_prefix,
            store_timeout: std::time::Duration::from_millis(store_timeout_ms),
            cors_origin,
            log_format,
        }
    }
}
