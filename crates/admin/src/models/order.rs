//! Orders as the back-office sees them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use cafe_rencontre_core::{Customization, OrderId, OrderStatus, UserId};

/// A placed order line with its checkout reference.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    /// `CR-` number of the checkout this line belongs to, if any.
    pub order_number: Option<String>,
    pub user_id: Option<UserId>,
    pub product_name: String,
    pub description: String,
    pub product_image: Option<String>,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub customer_notes: Option<String>,
    pub customization: Option<Customization>,
    /// Human-readable summary of `customization`.
    pub customization_label: Option<String>,
    pub ordered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Number of orders in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderCounts {
    pub pending: i64,
    pub accepted: i64,
    pub declined: i64,
    pub cancelled: i64,
    pub total: i64,
}

impl OrderCounts {
    /// Fold `(status, count)` rows from a `GROUP BY status` query.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = (OrderStatus, i64)>) -> Self {
        rows.into_iter()
            .fold(Self::default(), |mut counts, (status, count)| {
                *counts.slot(status) += count;
                counts.total += count;
                counts
            })
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: OrderStatus) -> i64 {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Accepted => self.accepted,
            OrderStatus::Declined => self.declined,
            OrderStatus::Cancelled => self.cancelled,
        }
    }

    const fn slot(&mut self, status: OrderStatus) -> &mut i64 {
        match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Accepted => &mut self.accepted,
            OrderStatus::Declined => &mut self.declined,
            OrderStatus::Cancelled => &mut self.cancelled,
        }
    }
}
