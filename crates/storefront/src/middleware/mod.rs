//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store; holds the cart)
//! 5. Rate limiting on order-creating routes (governor)

pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use rate_limit::checkout_rate_limiter;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
