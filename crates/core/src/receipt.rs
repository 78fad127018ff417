//! Receipt summaries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::{CartLine, CartTotals, TAX_RATE, line_total, unit_price};
use crate::customization::Customization;
use crate::order::{OrderDraft, order_number};

/// One printed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// Customization caption, e.g. `Large (20oz), Sugar: 0%, No Milk`.
    pub customization: Option<String>,
}

/// What the customer gets back after buying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub order_number: String,
    pub ordered_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub totals: CartTotals,
}

impl Receipt {
    /// Receipt for cart lines, numbered from `at`.
    #[must_use]
    pub fn from_lines(lines: &[CartLine], at: DateTime<Utc>) -> Self {
        Self {
            order_number: order_number(at),
            ordered_at: at,
            lines: lines
                .iter()
                .map(|line| ReceiptLine {
                    name: line.product.name.clone(),
                    quantity: i64::from(line.quantity),
                    unit_price: unit_price(line),
                    line_total: line_total(line),
                    customization: line.customization.as_ref().map(Customization::describe),
                })
                .collect(),
            totals: CartTotals::compute(lines),
        }
    }

    /// Receipt for stored or freshly written order lines.
    #[must_use]
    pub fn from_drafts(order_number: String, at: DateTime<Utc>, drafts: &[OrderDraft]) -> Self {
        let subtotal: Decimal = drafts.iter().map(|d| d.total_amount).sum();
        let tax = subtotal * TAX_RATE;
        Self {
            order_number,
            ordered_at: at,
            lines: drafts
                .iter()
                .map(|draft| ReceiptLine {
                    name: draft.product_name.clone(),
                    quantity: i64::from(draft.quantity),
                    unit_price: draft.price,
                    line_total: draft.total_amount,
                    customization: draft.customization.as_ref().map(Customization::describe),
                })
                .collect(),
            totals: CartTotals {
                subtotal,
                tax,
                total: subtotal + tax,
            },
        }
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
