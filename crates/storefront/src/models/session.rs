//! Session-related types.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the serialized cart lines.
    pub const CART: &str = cafe_rencontre_core::CART_STORAGE_KEY;
}
