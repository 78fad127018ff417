//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::models::UserDirectory;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    users: UserDirectory,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool, users: UserDirectory) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Customer directory for the users screen.
    #[must_use]
    pub fn users(&self) -> &UserDirectory {
        &self.inner.users
    }
}
