//! Domain models for storefront.

pub mod order;
pub mod session;

pub use order::{Checkout, Order};
pub use session::keys as session_keys;
