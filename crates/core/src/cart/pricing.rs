//! Cart pricing.
//!
//! Pure functions over cart lines. Quantities are at least 1 by the time a
//! line reaches these functions, so nothing here can fail.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CartLine;
use crate::customization::surcharge_for;
use crate::types::{CurrencyCode, Price};

/// Sales tax applied to the subtotal (12% VAT).
pub const TAX_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Base price plus every customization surcharge, for one unit.
#[must_use]
pub fn unit_price(line: &CartLine) -> Decimal {
    line.product.price + surcharge_for(line.customization.as_ref())
}

/// Unit price times quantity.
#[must_use]
pub fn line_total(line: &CartLine) -> Decimal {
    unit_price(line) * Decimal::from(line.quantity)
}

/// Sum of line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(line_total).sum()
}

/// Tax owed on `subtotal`.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    subtotal * TAX_RATE
}

/// Subtotal, tax and total of a set of lines, in pesos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    #[must_use]
    pub fn compute(lines: &[CartLine]) -> Self {
        let subtotal = subtotal(lines);
        let tax = tax(subtotal);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Totals converted for display in `currency`.
    #[must_use]
    pub fn in_currency(&self, currency: CurrencyCode) -> [Price; 3] {
        [self.subtotal, self.tax, self.total]
            .map(|amount| Price::php(amount).convert_to(currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::customization::{Customization, MilkOption, Size};
    use crate::types::ProductId;

    fn line(price: i64, quantity: u32, customization: Option<Customization>) -> CartLine {
        CartLine::new(
            Product {
                id: ProductId::new(1),
                name: "Spanish Latte".to_owned(),
                description: "hot, creamy".to_owned(),
                price: Decimal::from(price),
                image: None,
            },
            quantity,
            customization,
        )
    }

    #[test]
    fn test_medium_oat_example() {
        let custom = Customization {
            size: Size::Medium,
            milk: MilkOption::Oat,
            ..Customization::default()
        };
        let lines = [line(49, 2, Some(custom))];

        assert_eq!(unit_price(&lines[0]), Decimal::from(69));
        assert_eq!(line_total(&lines[0]), Decimal::from(138));

        let totals = CartTotals::compute(&lines);
        assert_eq!(totals.subtotal, Decimal::from(138));
        assert_eq!(totals.tax, Decimal::new(1656, 2));
        assert_eq!(totals.total, Decimal::new(15456, 2));
    }

    #[test]
    fn test_no_customization_is_base_price() {
        assert_eq!(unit_price(&line(55, 3, None)), Decimal::from(55));
        assert_eq!(line_total(&line(55, 3, None)), Decimal::from(165));
    }

    #[test]
    fn test_totals_identities() {
        let lines = [
            line(49, 1, None),
            line(
                55,
                3,
                Some(Customization {
                    extra_shot: true,
                    whipped_cream: true,
                    ..Customization::default()
                }),
            ),
        ];
        let totals = CartTotals::compute(&lines);
        let expected_subtotal: Decimal = lines
            .iter()
            .map(|l| unit_price(l) * Decimal::from(l.quantity))
            .sum();

        assert_eq!(totals.subtotal, expected_subtotal);
        assert_eq!(totals.tax, totals.subtotal * TAX_RATE);
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[test]
    fn test_empty_cart_is_zero() {
        assert_eq!(CartTotals::compute(&[]), CartTotals::default());
    }

    #[test]
    fn test_totals_in_usd() {
        let totals = CartTotals::compute(&[line(69, 2, None)]);
        let [_, _, total] = totals.in_currency(CurrencyCode::USD);
        assert_eq!(total.display(), "$2.76");
    }
}
