//! Stock unit (quant) models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, GroupId, LocationId, LotId, ProductId, UnitId};

/// Class of the location a unit sits in, derived from the location usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationClass {
    #[default]
    OnHand,
    InTransit,
    Other,
}

impl LocationClass {
    /// Map a location usage flag ("internal", "transit", ...) to its class
    pub fn from_usage(usage: &str) -> Self {
        match usage {
            "internal" => LocationClass::OnHand,
            "transit" => LocationClass::InTransit,
            _ => LocationClass::Other,
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, LocationClass::InTransit)
    }
}

/// One discrete quantity of a product at a location, optionally tied to a lot.
///
/// Every extension attribute is declared here with an explicit default so
/// callers never probe for its existence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockUnit {
    pub id: UnitId,

    // Product
    pub product_id: ProductId,
    pub product_name: String,
    pub product_code: Option<String>,
    pub category_id: Option<CategoryId>,
    pub uom_name: String,

    // Lot
    pub lot_id: Option<LotId>,
    pub lot_name: Option<String>,

    // Location
    pub location_id: LocationId,
    pub location_name: String,
    /// Materialized ancestry, e.g. "<root>/<child>/<self>/"
    pub location_parent_path: String,
    pub location_class: LocationClass,

    // Quantities
    pub quantity: Decimal,
    pub reserved_quantity: Decimal,
    pub has_active_hold: bool,

    // Dimensions
    pub height: Option<Decimal>,
    pub width: Option<Decimal>,
    pub thickness: Option<Decimal>,

    // Categorical attributes used for filtering and display
    pub stone_type: Option<String>,
    pub stone_type_label: Option<String>,
    pub group_id: Option<GroupId>,
    pub finish: Option<String>,
    pub color: Option<String>,
    pub format: Option<String>,
    pub block: Option<String>,
    pub bundle: Option<String>,
    pub container: Option<String>,
    pub customs_declaration: Option<String>,
    pub supplier_reference: Option<String>,
}

impl StockUnit {
    /// Whether the unit's location is `location_id` or one of its descendants
    pub fn is_within_location(&self, location_id: LocationId) -> bool {
        if self.location_id == location_id {
            return true;
        }
        let needle = location_id.to_string();
        self.location_parent_path
            .split('/')
            .any(|segment| segment == needle)
    }

    /// Display label for the stone type, falling back to the raw code
    pub fn stone_type_display(&self) -> String {
        self.stone_type_label
            .clone()
            .or_else(|| self.stone_type.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_location_class_from_usage() {
        assert_eq!(LocationClass::from_usage("internal"), LocationClass::OnHand);
        assert_eq!(LocationClass::from_usage("transit"), LocationClass::InTransit);
        assert_eq!(LocationClass::from_usage("customer"), LocationClass::Other);
        assert!(LocationClass::InTransit.is_transit());
        assert!(!LocationClass::Other.is_transit());
    }

    #[test]
    fn test_is_within_location_descendant() {
        let root = Uuid::new_v4();
        let shelf = Uuid::new_v4();
        let bin = Uuid::new_v4();
        let unit = StockUnit {
            location_id: bin,
            location_parent_path: format!("{}/{}/{}/", root, shelf, bin),
            ..Default::default()
        };

        assert!(unit.is_within_location(root));
        assert!(unit.is_within_location(shelf));
        assert!(unit.is_within_location(bin));
        assert!(!unit.is_within_location(Uuid::new_v4()));
    }

    #[test]
    fn test_stone_type_display() {
        let mut unit = StockUnit {
            stone_type: Some("marble".to_string()),
            ..Default::default()
        };
        assert_eq!(unit.stone_type_display(), "marble");

        unit.stone_type_label = Some("Mármol".to_string());
        assert_eq!(unit.stone_type_display(), "Mármol");
    }
}
