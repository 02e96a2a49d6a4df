//! Per-unit drill-down projection

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::InventoryResult;
use crate::models::{plate_area, HoldInfo, LocationClass, PlateCounts, QuantityBuckets, StockUnit};
use crate::reconcile::classify;
use crate::types::{Capabilities, Capability, LocationId, LotId, UnitId};

/// Data about a unit that lives outside the unit record
#[derive(Debug, Clone, Default)]
pub struct UnitExtras {
    pub photo_count: i64,
    pub plate_notes: String,
    pub hold: Option<HoldInfo>,
    pub sale_order_ids: Vec<Uuid>,
}

/// Customer-sensitive part of a unit detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSalesData {
    pub has_hold: bool,
    pub hold_info: Option<HoldInfo>,
    pub in_sale_order: bool,
    pub sale_order_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDetail {
    pub id: UnitId,
    pub lot_id: Option<LotId>,
    pub lot_name: String,
    pub location_id: LocationId,
    pub location_name: String,
    pub location_class: LocationClass,

    pub quantity: Decimal,
    pub reserved_quantity: Decimal,
    pub amounts: QuantityBuckets,
    pub plate_area: Decimal,
    pub plates: PlateCounts,

    pub thickness: Option<Decimal>,
    pub height: Option<Decimal>,
    pub width: Option<Decimal>,
    pub color: String,
    pub stone_type: String,
    pub block: String,
    pub bundle: String,
    pub customs_declaration: String,
    pub container: String,
    pub supplier_reference: String,

    pub photo_count: i64,
    pub plate_notes: String,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub sales: Option<UnitSalesData>,
}

/// Project one unit, classifying it exactly like the aggregate view does
pub fn unit_detail(unit: &StockUnit, extras: UnitExtras, include_sales: bool) -> UnitDetail {
    let classification = classify(unit);
    let area = plate_area(unit.height, unit.width).unwrap_or(Decimal::ZERO);
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    let sales = include_sales.then(|| UnitSalesData {
        has_hold: unit.has_active_hold,
        hold_info: extras.hold,
        in_sale_order: !extras.sale_order_ids.is_empty(),
        sale_order_ids: extras.sale_order_ids,
    });

    UnitDetail {
        id: unit.id,
        lot_id: unit.lot_id,
        lot_name: text(&unit.lot_name),
        location_id: unit.location_id,
        location_name: unit.location_name.clone(),
        location_class: unit.location_class,
        quantity: unit.quantity,
        reserved_quantity: unit.reserved_quantity,
        amounts: classification.buckets,
        plate_area: area,
        plates: classification.buckets.plates(area),
        thickness: unit.thickness,
        height: unit.height,
        width: unit.width,
        color: text(&unit.color),
        stone_type: unit.stone_type_display(),
        block: text(&unit.block),
        bundle: text(&unit.bundle),
        customs_declaration: text(&unit.customs_declaration),
        container: text(&unit.container),
        supplier_reference: text(&unit.supplier_reference),
        photo_count: extras.photo_count,
        plate_notes: extras.plate_notes,
        sales,
    }
}

/// Project a batch of units. Sales data is refused outright when the caller
/// cannot see it, never silently dropped.
pub fn unit_details(
    units: &[StockUnit],
    mut extras: HashMap<UnitId, UnitExtras>,
    include_sales: bool,
    capabilities: &Capabilities,
) -> InventoryResult<Vec<UnitDetail>> {
    if include_sales {
        capabilities.require(Capability::ViewSalesData)?;
    }
    Ok(units
        .iter()
        .map(|unit| {
            let unit_extras = extras.remove(&unit.id).unwrap_or_default();
            unit_detail(unit, unit_extras, include_sales)
        })
        .collect())
}
