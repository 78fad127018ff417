//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Session layer (tower-sessions with `PostgreSQL` store, SameSite=Strict)
//! 4. Rate limiting on `/auth/login` (governor)
//! 5. Auth extractors on every handler except login

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{RequireAdminAuth, RequireOrderManager};
pub use rate_limit::login_rate_limiter;
pub use session::create_session_layer;
