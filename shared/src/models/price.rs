//! Product price tiers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Currency, PriceLevel};

/// One of the four price columns the range filter can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    UsdHigh,
    UsdMedium,
    MxnHigh,
    MxnMedium,
}

impl PriceField {
    pub fn for_tier(currency: Currency, level: PriceLevel) -> Self {
        match (currency, level) {
            (Currency::Usd, PriceLevel::High) => PriceField::UsdHigh,
            (Currency::Usd, PriceLevel::Medium) => PriceField::UsdMedium,
            (Currency::Mxn, PriceLevel::High) => PriceField::MxnHigh,
            (Currency::Mxn, PriceLevel::Medium) => PriceField::MxnMedium,
        }
    }

    /// Resolve raw request values; any unrecognized combination is USD/high
    pub fn resolve(currency: Option<&str>, level: Option<&str>) -> Self {
        let currency = currency.map_or(Some(Currency::Usd), Currency::from_code);
        let level = level.map_or(Some(PriceLevel::High), PriceLevel::from_str);
        match (currency, level) {
            (Some(c), Some(l)) => Self::for_tier(c, l),
            _ => PriceField::UsdHigh,
        }
    }
}

/// Price columns of a product. The third tier is the floor a seller may
/// offer without authorization and is not filterable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPrices {
    pub usd_high: Option<Decimal>,
    pub usd_medium: Option<Decimal>,
    pub usd_minimum: Option<Decimal>,
    pub mxn_high: Option<Decimal>,
    pub mxn_medium: Option<Decimal>,
    pub mxn_minimum: Option<Decimal>,
}

impl ProductPrices {
    /// Price stored in `field`; unset prices read as zero
    pub fn get(&self, field: PriceField) -> Decimal {
        match field {
            PriceField::UsdHigh => self.usd_high,
            PriceField::UsdMedium => self.usd_medium,
            PriceField::MxnHigh => self.mxn_high,
            PriceField::MxnMedium => self.mxn_medium,
        }
        .unwrap_or(Decimal::ZERO)
    }

    pub fn medium(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.usd_medium,
            Currency::Mxn => self.mxn_medium,
        }
        .unwrap_or(Decimal::ZERO)
    }

    pub fn minimum(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.usd_minimum,
            Currency::Mxn => self.mxn_minimum,
        }
        .unwrap_or(Decimal::ZERO)
    }
}
