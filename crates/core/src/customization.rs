//! Drink customization and surcharge rules.
//!
//! Every option is a closed enum so surcharge lookup is an exhaustive
//! `match`; an unknown size or milk can only fail at deserialization time,
//! never while pricing.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Surcharge for an extra espresso shot.
pub const EXTRA_SHOT_FEE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
/// Surcharge for whipped cream.
pub const WHIPPED_CREAM_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
/// Surcharge for cinnamon powder.
pub const CINNAMON_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Cup size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    #[default]
    Small,
    Medium,
    Large,
}

impl Size {
    /// Surcharge over the base price.
    #[must_use]
    pub const fn surcharge(self) -> Decimal {
        match self {
            Self::Small => Decimal::ZERO,
            Self::Medium => Decimal::TEN,
            Self::Large => Decimal::from_parts(20, 0, 0, false, 0),
        }
    }

    /// Cup volume in fluid ounces.
    #[must_use]
    pub const fn ounces(self) -> u8 {
        match self {
            Self::Small => 12,
            Self::Medium => 16,
            Self::Large => 20,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

/// Milk choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MilkOption {
    None,
    #[default]
    Regular,
    Oat,
    Almond,
}

impl MilkOption {
    /// Surcharge over the base price. Plant milks cost extra.
    #[must_use]
    pub const fn surcharge(self) -> Decimal {
        match self {
            Self::None | Self::Regular => Decimal::ZERO,
            Self::Oat | Self::Almond => Decimal::TEN,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::None => "No Milk",
            Self::Regular => "Regular Milk",
            Self::Oat => "Oat Milk",
            Self::Almond => "Almond Milk",
        }
    }
}

/// Sugar level outside `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sugar level must be between 0 and 100 (got {0})")]
pub struct SugarLevelError(pub u16);

/// Sugar as a percentage of the standard recipe. Never priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SugarLevel(u8);

impl SugarLevel {
    /// Full sweetness.
    pub const MAX: u8 = 100;

    /// Validate a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`SugarLevelError`] for values above 100.
    pub fn new(percent: u16) -> Result<Self, SugarLevelError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= Self::MAX)
            .map(Self)
            .ok_or(SugarLevelError(percent))
    }

    /// The percentage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }
}

impl Default for SugarLevel {
    fn default() -> Self {
        Self(50)
    }
}

impl<'de> Deserialize<'de> for SugarLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u16::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Modifiers attached to a cart line.
///
/// Has no identity: two customizations are the same when every field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Customization {
    pub size: Size,
    pub milk: MilkOption,
    pub sugar_level: SugarLevel,
    pub extra_shot: bool,
    pub whipped_cream: bool,
    pub cinnamon: bool,
}

impl Customization {
    /// Total surcharge added to the base price of one unit.
    #[must_use]
    pub fn surcharge(&self) -> Decimal {
        let mut total = self.size.surcharge() + self.milk.surcharge();
        if self.extra_shot {
            total += EXTRA_SHOT_FEE;
        }
        if self.whipped_cream {
            total += WHIPPED_CREAM_FEE;
        }
        if self.cinnamon {
            total += CINNAMON_FEE;
        }
        total
    }

    /// Human-readable summary for receipts and order notes,
    /// e.g. `Medium (16oz), Sugar: 50%, Oat Milk, Extra Shot`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Customization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}oz), Sugar: {}%, {}",
            self.size.label(),
            self.size.ounces(),
            self.sugar_level.percent(),
            self.milk.label()
        )?;
        for (enabled, label) in [
            (self.extra_shot, "Extra Shot"),
            (self.whipped_cream, "Whipped Cream"),
            (self.cinnamon, "Cinnamon Powder"),
        ] {
            if enabled {
                write!(f, ", {label}")?;
            }
        }
        Ok(())
    }
}

/// Surcharge for an optional customization; absent means none.
#[must_use]
pub fn surcharge_for(customization: Option<&Customization>) -> Decimal {
    customization.map_or(Decimal::ZERO, Customization::surcharge)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn medium_oat() -> Customization {
        Customization {
            size: Size::Medium,
            milk: MilkOption::Oat,
            ..Customization::default()
        }
    }

    #[test]
    fn test_medium_oat_costs_twenty() {
        assert_eq!(medium_oat().surcharge(), Decimal::from(20));
    }

    #[test]
    fn test_every_add_on_is_priced() {
        let loaded = Customization {
            size: Size::Large,
            milk: MilkOption::Almond,
            sugar_level: SugarLevel::new(0).unwrap(),
            extra_shot: true,
            whipped_cream: true,
            cinnamon: true,
        };
        // 20 + 10 + 15 + 10 + 5
        assert_eq!(loaded.surcharge(), Decimal::from(60));
    }

    #[test]
    fn test_absent_customization_has_no_surcharge() {
        assert_eq!(surcharge_for(None), Decimal::ZERO);
        assert_eq!(surcharge_for(Some(&medium_oat())), Decimal::from(20));
    }

    #[test]
    fn test_sugar_level_bounds() {
        assert_eq!(SugarLevel::new(100).unwrap().percent(), 100);
        assert_eq!(SugarLevel::new(101), Err(SugarLevelError(101)));
        assert_eq!(SugarLevel::new(300), Err(SugarLevelError(300)));
        assert!(serde_json::from_str::<SugarLevel>("120").is_err());
    }

    #[test]
    fn test_unknown_milk_is_rejected() {
        let err = serde_json::from_str::<Customization>(r#"{"milk":"soy"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let custom: Customization = serde_json::from_str(r#"{"size":"large"}"#).unwrap();
        assert_eq!(custom.size, Size::Large);
        assert_eq!(custom.milk, MilkOption::Regular);
        assert_eq!(custom.sugar_level.percent(), 50);
    }

    #[test]
    fn test_describe() {
        let custom = Customization {
            extra_shot: true,
            cinnamon: true,
            ..medium_oat()
        };
        assert_eq!(
            custom.describe(),
            "Medium (16oz), Sugar: 50%, Oat Milk, Extra Shot, Cinnamon Powder"
        );
    }
}
