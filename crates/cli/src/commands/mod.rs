//! Subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use cafe_rencontre_admin::db::RepositoryError;
use cafe_rencontre_admin::services::AuthError;
use cafe_rencontre_core::ConfigError;
use cafe_rencontre_core::config::get_database_url;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Connect with the URL in `env_key`, falling back to `DATABASE_URL`.
async fn connect(env_key: &str) -> Result<PgPool, CliError> {
    let database_url: SecretString = get_database_url(env_key)?;
    tracing::info!("Connecting to database ({env_key})...");
    Ok(cafe_rencontre_admin::db::create_pool(&database_url).await?)
}
