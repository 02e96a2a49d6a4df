//! Common types used across the inventory views

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InventoryError;

pub type UnitId = Uuid;
pub type ProductId = Uuid;
pub type LotId = Uuid;
pub type LocationId = Uuid;
pub type CategoryId = Uuid;
pub type GroupId = Uuid;
pub type PartnerId = Uuid;
pub type ProjectId = Uuid;

/// Currencies products are priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Mxn,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Mxn => "MXN",
        }
    }

    /// Parse an ISO code, case-insensitively
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "MXN" => Some(Currency::Mxn),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Price tier: "high" is the list price, "medium" the negotiated one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    #[default]
    High,
    Medium,
}

impl PriceLevel {
    pub fn from_str(level: &str) -> Option<Self> {
        match level.trim().to_ascii_lowercase().as_str() {
            "high" => Some(PriceLevel::High),
            "medium" => Some(PriceLevel::Medium),
            _ => None,
        }
    }
}

/// A single permission the caller may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewInventory,
    ViewSalesData,
    ManageHolds,
    ViewPurchases,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewInventory => "view_inventory",
            Capability::ViewSalesData => "view_sales_data",
            Capability::ManageHolds => "manage_holds",
            Capability::ViewPurchases => "view_purchases",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities granted to the caller of an operation.
///
/// Passed explicitly into every operation that needs a permission decision
/// instead of being read from session state deep inside helpers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_view_inventory: bool,
    pub can_view_sales_data: bool,
    pub can_manage_holds: bool,
    pub can_view_purchases: bool,
}

impl Capabilities {
    /// Every capability granted
    pub fn all() -> Self {
        Self {
            can_view_inventory: true,
            can_view_sales_data: true,
            can_manage_holds: true,
            can_view_purchases: true,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewInventory => self.can_view_inventory,
            Capability::ViewSalesData => self.can_view_sales_data,
            Capability::ManageHolds => self.can_manage_holds,
            Capability::ViewPurchases => self.can_view_purchases,
        }
    }

    /// Refuse the call when the capability is missing
    pub fn require(&self, capability: Capability) -> Result<(), InventoryError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(InventoryError::PermissionDenied(capability))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::Usd));
        assert_eq!(Currency::from_code(" MXN "), Some(Currency::Mxn));
        assert_eq!(Currency::from_code("EUR"), None);
        assert_eq!(Currency::Mxn.to_string(), "MXN");
    }

    #[test]
    fn test_require_missing_capability() {
        let caps = Capabilities {
            can_view_inventory: true,
            ..Default::default()
        };
        assert!(caps.require(Capability::ViewInventory).is_ok());
        assert_eq!(
            caps.require(Capability::ManageHolds),
            Err(InventoryError::PermissionDenied(Capability::ManageHolds))
        );
    }
}
