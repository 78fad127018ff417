//! Order domain types.
//!
//! These types represent stored orders separate from database row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use cafe_rencontre_core::{Customization, OrderDraft, OrderId, OrderStatus, Receipt};

/// A stored order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    pub product_name: String,
    pub description: String,
    pub product_image: Option<String>,
    pub quantity: i32,
    /// Unit price including surcharges.
    pub price: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub customer_notes: Option<String>,
    pub customization: Option<Customization>,
    pub ordered_at: DateTime<Utc>,
}

impl Order {
    /// The fields the order was created from.
    #[must_use]
    pub fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            product_name: self.product_name.clone(),
            description: self.description.clone(),
            product_image: self.product_image.clone(),
            quantity: self.quantity,
            price: self.price,
            total_amount: self.total_amount,
            customer_notes: self.customer_notes.clone(),
            customization: self.customization,
            ordered_at: self.ordered_at,
        }
    }
}

/// A committed checkout and the orders it created.
#[derive(Debug, Clone, Serialize)]
pub struct Checkout {
    pub order_number: String,
    pub ordered_at: DateTime<Utc>,
    pub orders: Vec<Order>,
    /// True when the idempotency key had already been used and nothing new
    /// was written.
    pub replayed: bool,
}

impl Checkout {
    /// Receipt for the committed orders.
    #[must_use]
    pub fn receipt(&self) -> Receipt {
        let drafts: Vec<OrderDraft> = self.orders.iter().map(Order::to_draft).collect();
        Receipt::from_drafts(self.order_number.clone(), self.ordered_at, &drafts)
    }
}
