//! Per-product inventory aggregates

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, UnitId};

/// Quantity split of one location class.
///
/// `available` is always the remainder, so `stock = hold + committed + available`
/// holds exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityBuckets {
    pub stock: Decimal,
    pub hold: Decimal,
    pub committed: Decimal,
    pub available: Decimal,
}

impl QuantityBuckets {
    pub fn add(&mut self, other: &QuantityBuckets) {
        self.stock += other.stock;
        self.hold += other.hold;
        self.committed += other.committed;
        self.available += other.available;
    }

    pub fn is_balanced(&self) -> bool {
        self.stock == self.hold + self.committed + self.available
    }

    /// Plate counts per bucket, each rounded independently
    pub fn plates(&self, plate_area: Decimal) -> PlateCounts {
        PlateCounts {
            stock: plate_count(self.stock, plate_area),
            hold: plate_count(self.hold, plate_area),
            committed: plate_count(self.committed, plate_area),
            available: plate_count(self.available, plate_area),
        }
    }
}

/// Plate counts derived from a [`QuantityBuckets`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateCounts {
    pub stock: i64,
    pub hold: i64,
    pub committed: i64,
    pub available: i64,
}

/// Number of plates covering `quantity`, rounded half-to-even.
///
/// Returns 0 when no valid plate area is known.
pub fn plate_count(quantity: Decimal, plate_area: Decimal) -> i64 {
    if plate_area <= Decimal::ZERO {
        return 0;
    }
    quantity
        .checked_div(plate_area)
        .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_i64())
        .unwrap_or(0)
}

/// Area of one plate, when both dimensions are present and positive
pub fn plate_area(height: Option<Decimal>, width: Option<Decimal>) -> Option<Decimal> {
    match (height, width) {
        (Some(h), Some(w)) if h > Decimal::ZERO && w > Decimal::ZERO => h.checked_mul(w),
        _ => None,
    }
}

/// Inventory summary of one product, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAggregate {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_code: String,
    /// Name of the leaf reached from the product category by first-child descent
    pub category_name: String,
    pub uom_name: String,
    pub stone_type: String,
    pub color: String,
    pub format: String,
    pub unit_ids: Vec<UnitId>,

    pub on_hand: QuantityBuckets,
    pub in_transit: QuantityBuckets,

    /// Area of the first unit with valid dimensions; zero when none had any
    pub plate_area: Decimal,
    pub on_hand_plates: PlateCounts,
    pub in_transit_plates: PlateCounts,
}

impl ProductAggregate {
    /// Derive plate counts from the accumulated quantities
    pub fn finalize_plates(&mut self) {
        self.on_hand_plates = self.on_hand.plates(self.plate_area);
        self.in_transit_plates = self.in_transit.plates(self.plate_area);
    }

    pub fn unit_count(&self) -> usize {
        self.unit_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plate_count_rounds_half_to_even() {
        // 5.0 / 2.0 = 2.5 -> 2 under half-to-even
        assert_eq!(plate_count(dec("5.0"), dec("2.0")), 2);
        // 7.0 / 2.0 = 3.5 -> 4
        assert_eq!(plate_count(dec("7.0"), dec("2.0")), 4);
        assert_eq!(plate_count(dec("5.9"), dec("2.0")), 3);
    }

    #[test]
    fn test_plate_count_without_area() {
        assert_eq!(plate_count(dec("10.0"), Decimal::ZERO), 0);
        assert_eq!(plate_count(dec("10.0"), dec("-1")), 0);
    }

    #[test]
    fn test_plate_area_requires_positive_dimensions() {
        assert_eq!(plate_area(Some(dec("1.5")), Some(dec("2"))), Some(dec("3.0")));
        assert_eq!(plate_area(Some(dec("0")), Some(dec("2"))), None);
        assert_eq!(plate_area(None, Some(dec("2"))), None);
        assert_eq!(plate_area(Some(dec("-1")), Some(dec("-2"))), None);
    }

    #[test]
    fn test_buckets_add_and_balance() {
        let mut total = QuantityBuckets::default();
        total.add(&QuantityBuckets {
            stock: dec("5"),
            hold: dec("5"),
            committed: Decimal::ZERO,
            available: Decimal::ZERO,
        });
        total.add(&QuantityBuckets {
            stock: dec("4"),
            hold: Decimal::ZERO,
            committed: dec("1.5"),
            available: dec("2.5"),
        });
        assert_eq!(total.stock, dec("9"));
        assert!(total.is_balanced());
    }
}
