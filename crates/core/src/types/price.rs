//! Money as shown to shoppers.
//!
//! The shop prices everything in Philippine pesos. The English storefront
//! shows dollar amounts converted at a fixed rate; the conversion is for
//! display only and never feeds back into order totals.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Pesos per US dollar used for display conversion.
pub const PHP_PER_USD: Decimal = Decimal::from_parts(56, 0, 0, false, 0);

/// An amount with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (pesos, dollars).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A price in the store currency.
    #[must_use]
    pub const fn php(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::PHP)
    }

    /// Convert to another display currency.
    #[must_use]
    pub fn convert_to(self, target: CurrencyCode) -> Self {
        let amount = match (self.currency_code, target) {
            (CurrencyCode::PHP, CurrencyCode::USD) => self.amount / PHP_PER_USD,
            (CurrencyCode::USD, CurrencyCode::PHP) => self.amount * PHP_PER_USD,
            _ => self.amount,
        };
        Self::new(amount, target)
    }

    /// Format for display, e.g. `₱154.56`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes the storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    #[default]
    PHP,
    USD,
}

impl CurrencyCode {
    /// Currency symbol used in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PHP => "₱",
            Self::USD => "$",
        }
    }
}
