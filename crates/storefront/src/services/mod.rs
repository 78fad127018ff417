//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart persistence
//! - `catalog` - Cached product catalog

pub mod cart;
pub mod catalog;

pub use cart::{SessionCartStorage, load_cart, save_cart};
pub use catalog::ProductCatalog;
