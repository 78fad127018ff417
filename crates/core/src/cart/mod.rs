//! The shopping cart.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s. Two lines are the same
//! line when they point at the same product with an identical
//! customization; adding an equal line merges quantities instead of
//! appending. Line order is kept for display and has no effect on totals.

mod pricing;
mod store;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::customization::Customization;
use crate::types::ProductId;

pub use pricing::{CartTotals, TAX_RATE, line_total, subtotal, tax, unit_price};
pub use store::{
    CART_STORAGE_KEY, CartError, CartStorage, CartStore, MemoryStorage, StorageError,
};

/// Most units of one line a cart will hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// One product, a quantity and an optional customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Between 1 and [`MAX_LINE_QUANTITY`] while the line is in a cart.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl CartLine {
    /// Create a line.
    #[must_use]
    pub const fn new(
        product: Product,
        quantity: u32,
        customization: Option<Customization>,
    ) -> Self {
        Self {
            product,
            quantity,
            customization,
        }
    }

    /// Whether this line is for `product_id` with exactly `customization`.
    ///
    /// `None` only matches `None`.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, customization: Option<&Customization>) -> bool {
        self.product.id == product_id && self.customization.as_ref() == customization
    }

    /// Whether `other` would merge into this line.
    #[must_use]
    pub fn is_same_line(&self, other: &Self) -> bool {
        self.matches(other.product.id, other.customization.as_ref())
    }
}

/// Cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<CartLine>", try_from = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from stored lines.
    ///
    /// Returns `None` when any line has a zero quantity or more than
    /// [`MAX_LINE_QUANTITY`].
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Option<Self> {
        lines
            .iter()
            .all(|line| (1..=MAX_LINE_QUANTITY).contains(&line.quantity))
            .then_some(Self { lines })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Subtotal, tax and total.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.lines)
    }

    /// Quantity already held by the matching line, 0 if there is none.
    pub(crate) fn quantity_of(
        &self,
        product_id: ProductId,
        customization: Option<&Customization>,
    ) -> u32 {
        self.position(product_id, customization)
            .map_or(0, |index| self.lines[index].quantity)
    }

    fn position(
        &self,
        product_id: ProductId,
        customization: Option<&Customization>,
    ) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.matches(product_id, customization))
    }

    /// Merge `line` into an equal line or append it. Quantities saturate.
    pub(crate) fn merge(&mut self, line: CartLine) {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.is_same_line(&line))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Remove the matching line. Returns whether anything was removed.
    pub(crate) fn remove(
        &mut self,
        product_id: ProductId,
        customization: Option<&Customization>,
    ) -> bool {
        self.position(product_id, customization)
            .map(|index| self.lines.remove(index))
            .is_some()
    }

    /// Set the quantity of the matching line. Returns whether it existed.
    pub(crate) fn set_quantity(
        &mut self,
        product_id: ProductId,
        customization: Option<&Customization>,
        quantity: u32,
    ) -> bool {
        self.lines
            .iter_mut()
            .find(|line| line.matches(product_id, customization))
            .map(|line| line.quantity = quantity)
            .is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = String;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines).ok_or_else(|| {
            format!("cart line quantity must be between 1 and {MAX_LINE_QUANTITY}")
        })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
