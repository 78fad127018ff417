//! Products as the cart and checkout see them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A purchasable menu item.
///
/// The catalog owns products; the cart keeps a snapshot of the fields it
/// needs to price a line and to write an order without going back to the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Base price in pesos, before customization surcharges.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image file name or URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Base price in the store currency.
    #[must_use]
    pub const fn base_price(&self) -> Price {
        Price::php(self.price)
    }

    /// Whether the drink is served over ice, judged from its description
    /// (`"iced, creamy"`).
    #[must_use]
    pub fn is_iced(&self) -> bool {
        self.description
            .split(',')
            .next()
            .is_some_and(|first| first.trim().eq_ignore_ascii_case("iced"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn latte() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Spanish Latte".to_owned(),
            description: "hot, creamy".to_owned(),
            price: Decimal::from(49),
            image: Some("spanish-latte.png".to_owned()),
        }
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(latte()).unwrap();
        assert_eq!(json["price"], serde_json::json!(49.0));
        assert_eq!(json["id"], serde_json::json!(1));
    }

    #[test]
    fn test_missing_image_defaults_to_none() {
        let product: Product = serde_json::from_str(
            r#"{"id":4,"name":"Americano","description":"hot, bold","price":49}"#,
        )
        .unwrap();
        assert_eq!(product.image, None);
        assert_eq!(product.price, Decimal::from(49));
    }

    #[test]
    fn test_is_iced() {
        assert!(!latte().is_iced());
        let iced = Product {
            description: "Iced, smooth".to_owned(),
            ..latte()
        };
        assert!(iced.is_iced());
    }
}
