//! Admin user management commands.
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `CR_ADMIN_PASSWORD` - password for `admin create` when `-p` is omitted

use cafe_rencontre_admin::db::AdminUserRepository;
use cafe_rencontre_admin::services::AuthService;
use cafe_rencontre_core::AdminRole;

use super::{CliError, connect};

/// Create an admin account with an argon2 password hash.
///
/// # Errors
///
/// Returns an error for an unknown role, an invalid email, a weak password,
/// or an email that is already registered.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), CliError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| CliError::InvalidRole(role.to_owned()))?;

    let pool = connect("ADMIN_DATABASE_URL").await?;

    tracing::info!("Creating admin user: {email} ({role})");
    let admin = AuthService::new(&pool)
        .register(email, name, role, password)
        .await?;

    tracing::info!(
        "Admin user created. ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role
    );
    Ok(())
}

/// Log every admin account.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn list_users() -> Result<(), CliError> {
    let pool = connect("ADMIN_DATABASE_URL").await?;
    let admins = AdminUserRepository::new(&pool)
        .list_all()
        .await?;

    tracing::info!("{} admin user(s)", admins.len());
    for admin in admins {
        tracing::info!("  {}  {}  {} <{}>", admin.id, admin.role, admin.name, admin.email);
    }
    Ok(())
}
