//! Business logic services for admin.

pub mod auth;

pub use auth::{AuthError, AuthService};
