//! Database migration commands.
//!
//! Both migration sets target the same database and share the
//! `_sqlx_migrations` table, so each migrator ignores versions applied by
//! the other.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - used by `migrate storefront`
//! - `ADMIN_DATABASE_URL` - used by `migrate admin`
//! - `DATABASE_URL` - fallback for either

use sqlx::migrate::Migrator;

use super::{CliError, connect};

/// Run storefront migrations: catalog, orders, storefront sessions.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn storefront() -> Result<(), CliError> {
    let mut migrator = sqlx::migrate!("../storefront/migrations");
    run("storefront", &mut migrator, "STOREFRONT_DATABASE_URL").await
}

/// Run admin migrations: accounts and admin sessions.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn admin() -> Result<(), CliError> {
    let mut migrator = sqlx::migrate!("../admin/migrations");
    run("admin", &mut migrator, "ADMIN_DATABASE_URL").await
}

async fn run(name: &str, migrator: &mut Migrator, env_key: &str) -> Result<(), CliError> {
    let pool = connect(env_key).await?;

    tracing::info!("Running {name} migrations ({} files)...", migrator.iter().count());
    migrator.set_ignore_missing(true).run(&pool).await?;

    tracing::info!("{name} migrations complete");
    Ok(())
}
