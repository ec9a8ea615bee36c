use crate::{
    adapters::persistence::PostgresPersistence,
    infra::db::{init_db, run_migrations},
};

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod revocation_store;
pub mod setup;

pub use error::InfraError;

pub async fn postgres_persistence(database_url: &str) -> Result<PostgresPersistence, InfraError> {
    let pool = init_db(database_url).await?;
    run_migrations(&pool).await?;
    let persistence = PostgresPersistence::new(pool);
    Ok(persistence)
}
