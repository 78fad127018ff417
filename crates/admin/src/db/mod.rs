//! Database operations for the back-office.
//!
//! The admin binary shares the storefront database.
//!
//! ## Tables
//!
//! - `admin.admin_user` - Back-office accounts (argon2 password hashes)
//! - `admin.session` - Admin session storage
//! - `cafe.order`, `cafe.checkout` - Orders placed on the storefront (read, status updates)
//! - `cafe.product` - Menu items (read-only here)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p cafe-rencontre-cli -- migrate admin
//! ```

pub mod admin_users;
pub mod orders;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cafe_rencontre_core::StatusTransitionError;

pub use admin_users::AdminUserRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Order status change not allowed from the stored status.
    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
