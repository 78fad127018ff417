//! Order drafts and checkout requests.
//!
//! An [`OrderDraft`] is the flat record written for one purchased line.
//! A [`CheckoutRequest`] groups the drafts for a whole cart so they can be
//! written in a single transaction, keyed for safe retries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::{Cart, CartLine, MAX_LINE_QUANTITY, line_total, unit_price};
use crate::customization::Customization;

/// Why a draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderDraftError {
    #[error("product name is required")]
    MissingProductName,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("price cannot be negative")]
    NegativePrice,

    #[error("total amount cannot be negative")]
    NegativeTotal,

    #[error("total amount {total} does not equal {price} x {quantity}")]
    TotalMismatch {
        price: Decimal,
        quantity: i32,
        total: Decimal,
    },

    #[error("quantity {quantity} exceeds the limit of {max}")]
    QuantityTooLarge { quantity: u32, max: u32 },

    #[error("amount exceeds {max}")]
    AmountOutOfRange { max: Decimal },

    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Largest price or total an order row can hold, `numeric(10,2)`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

/// One line of an order, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_image: Option<String>,
    pub quantity: i32,
    /// Unit price including surcharges.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub customization: Option<Customization>,
    #[serde(default = "Utc::now")]
    pub ordered_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Draft for a cart line, priced the same way the cart is.
    ///
    /// # Errors
    ///
    /// [`OrderDraftError::QuantityTooLarge`] when the line holds more than
    /// [`MAX_LINE_QUANTITY`].
    pub fn from_line(
        line: &CartLine,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Self, OrderDraftError> {
        let too_large = || OrderDraftError::QuantityTooLarge {
            quantity: line.quantity,
            max: MAX_LINE_QUANTITY,
        };
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(too_large());
        }
        Ok(Self {
            product_name: line.product.name.clone(),
            description: line.product.description.clone(),
            product_image: line.product.image.clone(),
            quantity: i32::try_from(line.quantity).map_err(|_| too_large())?,
            price: unit_price(line),
            total_amount: line_total(line),
            customer_notes: notes.filter(|n| !n.trim().is_empty()),
            customization: line.customization,
            ordered_at: at,
        })
    }

    /// Check the draft before it is written.
    ///
    /// # Errors
    ///
    /// Returns the first rule the draft breaks.
    pub fn validate(&self) -> Result<(), OrderDraftError> {
        if self.product_name.trim().is_empty() {
            return Err(OrderDraftError::MissingProductName);
        }
        if self.quantity < 1 {
            return Err(OrderDraftError::InvalidQuantity);
        }
        if self.price < Decimal::ZERO {
            return Err(OrderDraftError::NegativePrice);
        }
        if self.total_amount < Decimal::ZERO {
            return Err(OrderDraftError::NegativeTotal);
        }
        if self.price > MAX_AMOUNT || self.total_amount > MAX_AMOUNT {
            return Err(OrderDraftError::AmountOutOfRange { max: MAX_AMOUNT });
        }
        let expected = self
            .price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(OrderDraftError::AmountOutOfRange { max: MAX_AMOUNT })?;
        if expected != self.total_amount {
            return Err(OrderDraftError::TotalMismatch {
                price: self.price,
                quantity: self.quantity,
                total: self.total_amount,
            });
        }
        Ok(())
    }
}

/// Every line of a cart, submitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Replaying a request with the same key must not create new orders.
    pub idempotency_key: Uuid,
    pub lines: Vec<OrderDraft>,
    pub notes: Option<String>,
    pub ordered_at: DateTime<Utc>,
}

impl CheckoutRequest {
    /// Build a request from a cart. Every draft carries the same notes and
    /// timestamp.
    ///
    /// # Errors
    ///
    /// [`OrderDraftError::EmptyCart`] when there is nothing to buy, otherwise
    /// the first draft error.
    pub fn from_cart(
        cart: &Cart,
        idempotency_key: Uuid,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Self, OrderDraftError> {
        Self::from_lines(cart.lines(), idempotency_key, notes, at)
    }

    /// Build a request from arbitrary lines, e.g. a single "buy now" line.
    /// Every draft is validated before the request is returned.
    ///
    /// # Errors
    ///
    /// [`OrderDraftError::EmptyCart`] when `lines` is empty, otherwise the
    /// first draft error.
    pub fn from_lines(
        lines: &[CartLine],
        idempotency_key: Uuid,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Self, OrderDraftError> {
        if lines.is_empty() {
            return Err(OrderDraftError::EmptyCart);
        }
        let notes = notes.filter(|n| !n.trim().is_empty());
        let drafts = lines
            .iter()
            .map(|line| {
                let draft = OrderDraft::from_line(line, notes.clone(), at)?;
                draft.validate()?;
                Ok(draft)
            })
            .collect::<Result<Vec<_>, OrderDraftError>>()?;
        Ok(Self {
            idempotency_key,
            lines: drafts,
            notes,
            ordered_at: at,
        })
    }

    /// Sum of the line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|line| line.total_amount).sum()
    }

    /// Display number for this checkout.
    #[must_use]
    pub fn order_number(&self) -> String {
        order_number(self.ordered_at)
    }
}

/// Customer-facing order number: `CR-` and the last eight digits of the
/// millisecond timestamp.
#[must_use]
pub fn order_number(at: DateTime<Utc>) -> String {
    format!("CR-{:08}", at.timestamp_millis().rem_euclid(100_000_000))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::catalog::Product;
    use crate::customization::{MilkOption, Size};
    use crate::types::ProductId;

    fn latte_line(quantity: u32) -> CartLine {
        CartLine::new(
            Product {
                id: ProductId::new(1),
                name: "Spanish Latte".to_owned(),
                description: "hot, creamy".to_owned(),
                price: Decimal::from(49),
                image: Some("spanish-latte.png".to_owned()),
            },
            quantity,
            Some(Customization {
                size: Size::Medium,
                milk: MilkOption::Oat,
                ..Customization::default()
            }),
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_from_line_prices_with_surcharges() {
        let draft =
            OrderDraft::from_line(&latte_line(2), Some("less ice".to_owned()), at()).unwrap();
        assert_eq!(draft.price, Decimal::from(69));
        assert_eq!(draft.total_amount, Decimal::from(138));
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.customer_notes.as_deref(), Some("less ice"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let draft =
            OrderDraft::from_line(&latte_line(1), Some("   ".to_owned()), at()).unwrap();
        assert_eq!(draft.customer_notes, None);
    }

    #[test]
    fn test_validate_rules() {
        let good = OrderDraft::from_line(&latte_line(2), None, at()).unwrap();

        let mut draft = good.clone();
        draft.product_name = " ".to_owned();
        assert_eq!(draft.validate(), Err(OrderDraftError::MissingProductName));

        let mut draft = good.clone();
        draft.quantity = 0;
        assert_eq!(draft.validate(), Err(OrderDraftError::InvalidQuantity));

        let mut draft = good.clone();
        draft.price = Decimal::from(-1);
        assert_eq!(draft.validate(), Err(OrderDraftError::NegativePrice));

        let mut draft = good;
        draft.total_amount = Decimal::from(100);
        assert!(matches!(
            draft.validate(),
            Err(OrderDraftError::TotalMismatch { quantity: 2, .. })
        ));
    }

    #[test]
    fn test_validate_accepts_scaled_equal_totals() {
        let mut draft = OrderDraft::from_line(&latte_line(2), None, at()).unwrap();
        draft.price = Decimal::new(6900, 2);
        draft.total_amount = Decimal::new(1380, 1);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_huge_price_is_out_of_range() {
        let draft: OrderDraft = serde_json::from_value(serde_json::json!({
            "product_name": "Latte",
            "quantity": 2,
            "price": 5e28,
            "total_amount": 1
        }))
        .unwrap();
        assert!(matches!(
            draft.validate(),
            Err(OrderDraftError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_total_above_column_limit_is_rejected() {
        let mut draft = OrderDraft::from_line(&latte_line(2), None, at()).unwrap();
        draft.price = Decimal::from(99_999_999);
        draft.total_amount = Decimal::from(199_999_998);
        assert_eq!(
            draft.validate(),
            Err(OrderDraftError::AmountOutOfRange { max: MAX_AMOUNT })
        );
        assert_eq!(MAX_AMOUNT.to_string(), "99999999.99");
    }

    #[test]
    fn test_oversized_line_cannot_check_out() {
        let err = CheckoutRequest::from_lines(
            &[latte_line(1), latte_line(MAX_LINE_QUANTITY + 1)],
            Uuid::new_v4(),
            None,
            at(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            OrderDraftError::QuantityTooLarge {
                quantity: MAX_LINE_QUANTITY + 1,
                max: MAX_LINE_QUANTITY,
            }
        );

        let err = OrderDraft::from_line(&latte_line(u32::MAX), None, at()).unwrap_err();
        assert!(matches!(err, OrderDraftError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_checkout_request_from_cart() {
        let cart = Cart::from_lines(vec![latte_line(2), latte_line(1)]).unwrap();
        let key = Uuid::new_v4();
        let request =
            CheckoutRequest::from_cart(&cart, key, Some("for pickup".to_owned()), at()).unwrap();

        assert_eq!(request.idempotency_key, key);
        assert_eq!(request.lines.len(), 2);
        assert_eq!(request.subtotal(), Decimal::from(207));
        assert!(
            request
                .lines
                .iter()
                .all(|l| l.customer_notes.as_deref() == Some("for pickup"))
        );
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let err =
            CheckoutRequest::from_cart(&Cart::new(), Uuid::new_v4(), None, at()).unwrap_err();
        assert_eq!(err, OrderDraftError::EmptyCart);
    }

    #[test]
    fn test_order_number_format() {
        let number = order_number(at());
        let digits = number.strip_prefix("CR-").unwrap();
        assert_eq!(digits.len(), 8);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));

        let early = Utc.timestamp_millis_opt(42).unwrap();
        assert_eq!(order_number(early), "CR-00000042");
    }

    #[test]
    fn test_draft_deserializes_flat_fields() {
        let draft: OrderDraft = serde_json::from_value(serde_json::json!({
            "product_name": "Americano",
            "quantity": 1,
            "price": 49,
            "total_amount": 49,
        }))
        .unwrap();
        assert_eq!(draft.description, "");
        assert!(draft.customization.is_none());
        assert!(draft.validate().is_ok());
    }
}
