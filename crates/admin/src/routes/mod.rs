//! HTTP route handlers for admin.
//!
//! Every response is JSON. All routes except login need an admin session.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                 - Liveness check
//! GET   /health/ready           - Database readiness check
//!
//! # Auth
//! POST  /auth/login             - Email and password login (rate limited)
//! POST  /auth/logout            - End the session
//! GET   /auth/me                - Logged-in admin
//!
//! # Orders
//! GET   /orders?status=         - Latest first, with per-status counts
//! GET   /orders/{id}            - Order detail
//! PATCH /orders/{id}            - Status and notes (admin and super_admin)
//!
//! # Catalog
//! GET   /products               - Product listing
//!
//! # Users
//! GET   /users?q=               - Customer directory with summary
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// The login route. The binary wraps it in the login rate limiter.
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(auth::login))
}

/// Routes behind an admin session.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show).patch(orders::update))
        .route("/products", get(products::index))
        .route("/users", get(users::index))
}

/// Every back-office route, without rate limiting.
pub fn routes() -> Router<AppState> {
    login_routes().merge(protected_routes())
}
