//! Persisted cart state.
//!
//! [`CartStore`] owns the cart for as long as a caller needs it. Reads are
//! served from memory; every mutation is applied in memory and then the
//! whole line list is written through [`CartStorage`] as a JSON array.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use super::{Cart, CartLine, CartTotals, MAX_LINE_QUANTITY};
use crate::catalog::Product;
use crate::customization::Customization;
use crate::types::ProductId;

/// Key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cafe_rencontre_cart";

/// Persistence backend failure.
#[derive(Debug, Error)]
#[error("cart storage failed: {0}")]
pub struct StorageError(pub String);

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Line quantities stay between 1 and [`MAX_LINE_QUANTITY`].
    #[error("quantity must be between 1 and {}", MAX_LINE_QUANTITY)]
    InvalidQuantity,

    /// The new contents could not be persisted. The in-memory cart already
    /// reflects the mutation; the stored value is whatever was there before.
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value persistence for the cart.
pub trait CartStorage {
    /// The stored value, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Replace the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the write.
    fn save(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and tools.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a raw value under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value.into());
        Self { entries }
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// The cart plus the storage it persists to.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from `storage`.
    ///
    /// A missing key gives an empty cart. Unreadable data, or a line with a
    /// quantity outside 1..=[`MAX_LINE_QUANTITY`], is logged and also gives
    /// an empty cart.
    pub fn open(storage: S) -> Self {
        let cart = storage
            .load(CART_STORAGE_KEY)
            .map_or_else(Cart::new, |raw| decode(&raw));
        Self { cart, storage }
    }

    /// Add `quantity` of `product`, merging into an equal line.
    ///
    /// # Errors
    ///
    /// [`CartError::InvalidQuantity`] for a zero quantity or when the merged
    /// line would exceed [`MAX_LINE_QUANTITY`], or [`CartError::Storage`] if
    /// the new cart cannot be saved.
    pub fn add(
        &mut self,
        product: Product,
        quantity: u32,
        customization: Option<Customization>,
    ) -> Result<(), CartError> {
        let held = self.cart.quantity_of(product.id, customization.as_ref());
        if quantity == 0 || held.saturating_add(quantity) > MAX_LINE_QUANTITY {
            return Err(CartError::InvalidQuantity);
        }
        self.cart.merge(CartLine::new(product, quantity, customization));
        self.persist()
    }

    /// Drop the matching line whatever its quantity. A missing line is a
    /// no-op and nothing is written.
    ///
    /// # Errors
    ///
    /// [`CartError::Storage`] if the new cart cannot be saved.
    pub fn remove(
        &mut self,
        product_id: ProductId,
        customization: Option<&Customization>,
    ) -> Result<(), CartError> {
        if self.cart.remove(product_id, customization) {
            self.persist()
        } else {
            Ok(())
        }
    }

    /// Set the quantity of the matching line. Zero or less removes it.
    ///
    /// # Errors
    ///
    /// [`CartError::InvalidQuantity`] above [`MAX_LINE_QUANTITY`], or
    /// [`CartError::Storage`] if the new cart cannot be saved.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        customization: Option<&Customization>,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove(product_id, customization);
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::InvalidQuantity)?;
        if self.cart.set_quantity(product_id, customization, quantity) {
            self.persist()
        } else {
            Ok(())
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// [`CartError::Storage`] if the empty cart cannot be saved.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        self.persist()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.totals().subtotal
    }

    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.totals().tax
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.totals().total
    }

    /// Give the storage back, e.g. to flush a buffered backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let raw = serde_json::to_string(self.cart.lines())?;
        self.storage.save(CART_STORAGE_KEY, raw)?;
        Ok(())
    }
}

fn decode(raw: &str) -> Cart {
    match serde_json::from_str::<Vec<CartLine>>(raw) {
        Ok(lines) => Cart::from_lines(lines).unwrap_or_else(|| {
            warn!(
                key = CART_STORAGE_KEY,
                "Stored cart has a line quantity out of range, starting empty"
            );
            Cart::new()
        }),
        Err(e) => {
            warn!(
                key = CART_STORAGE_KEY,
                error = %e,
                "Stored cart is unreadable, starting empty"
            );
            Cart::new()
        }
    }
}
