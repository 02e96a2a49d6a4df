//! Quantity reconciliation
//!
//! Classifies every stock unit into hold, committed and available amounts
//! and folds the classifications into one [`ProductAggregate`] per product,
//! split between on-hand and in-transit locations.
//!
//! Hold and committed are mutually exclusive: a unit under an active hold
//! contributes its whole quantity to `hold` and nothing to `committed`,
//! otherwise its reserved quantity is `committed`. `available` is always the
//! remainder, never summed independently.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{plate_area, CategoryTree, ProductAggregate, QuantityBuckets, StockUnit};
use crate::types::ProductId;

/// Classification of a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitClassification {
    pub in_transit: bool,
    pub buckets: QuantityBuckets,
}

/// Split a unit's quantity into hold, committed and available.
///
/// The reserved quantity is clamped into `[0, quantity]` so a host record
/// violating that bound can never produce a negative remainder.
pub fn classify(unit: &StockUnit) -> UnitClassification {
    let quantity = unit.quantity;
    let reserved = unit
        .reserved_quantity
        .max(Decimal::ZERO)
        .min(quantity.max(Decimal::ZERO));

    let (hold, committed) = if unit.has_active_hold {
        (quantity, Decimal::ZERO)
    } else {
        (Decimal::ZERO, reserved)
    };

    UnitClassification {
        in_transit: unit.location_class.is_transit(),
        buckets: QuantityBuckets {
            stock: quantity,
            hold,
            committed,
            available: quantity - hold - committed,
        },
    }
}

fn new_aggregate(unit: &StockUnit, categories: &CategoryTree) -> ProductAggregate {
    let category_name = unit
        .category_id
        .and_then(|id| categories.resolve_leaf(id))
        .map(|leaf| leaf.name.clone())
        .unwrap_or_default();

    ProductAggregate {
        product_id: unit.product_id,
        product_name: unit.product_name.clone(),
        product_code: unit.product_code.clone().unwrap_or_default(),
        category_name,
        uom_name: unit.uom_name.clone(),
        stone_type: unit.stone_type_display(),
        color: unit.color.clone().unwrap_or_default(),
        format: unit.format.clone().unwrap_or_default(),
        unit_ids: Vec::new(),
        on_hand: QuantityBuckets::default(),
        in_transit: QuantityBuckets::default(),
        plate_area: Decimal::ZERO,
        on_hand_plates: Default::default(),
        in_transit_plates: Default::default(),
    }
}

/// Group units by product and reconcile their quantities.
///
/// Units are expected to be already filtered to non-zero quantities.
/// Descriptive fields and the plate area come from the first unit seen for
/// each product; the plate area is never overwritten once set.
pub fn reconcile<'a, I>(units: I, categories: &CategoryTree) -> HashMap<ProductId, ProductAggregate>
where
    I: IntoIterator<Item = &'a StockUnit>,
{
    let mut products: HashMap<ProductId, ProductAggregate> = HashMap::new();
    let mut unit_count = 0usize;

    for unit in units {
        unit_count += 1;
        let aggregate = products
            .entry(unit.product_id)
            .or_insert_with(|| new_aggregate(unit, categories));
        aggregate.unit_ids.push(unit.id);

        let classification = classify(unit);
        if classification.in_transit {
            aggregate.in_transit.add(&classification.buckets);
        } else {
            aggregate.on_hand.add(&classification.buckets);
        }

        if aggregate.plate_area <= Decimal::ZERO {
            if let Some(area) = plate_area(unit.height, unit.width) {
                aggregate.plate_area = area;
            }
        }
    }

    for aggregate in products.values_mut() {
        aggregate.finalize_plates();
    }

    tracing::debug!(
        units = unit_count,
        products = products.len(),
        "reconciled stock units"
    );

    products
}

/// Aggregates ordered by case-folded product name, ties broken by product id
pub fn sorted_by_name(products: HashMap<ProductId, ProductAggregate>) -> Vec<ProductAggregate> {
    let mut list: Vec<ProductAggregate> = products.into_values().collect();
    list.sort_by_cached_key(|p| (p.product_name.to_lowercase(), p.product_id));
    list
}
