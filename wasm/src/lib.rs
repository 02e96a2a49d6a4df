//! WebAssembly module for the Stone Inventory Visual client
//!
//! Lets the browser recompute what the server would, without a round trip:
//! - Reconciled product totals for a set of units
//! - Plate counts for a quantity and plate dimensions
//! - Hold expiry dates
//! - Whether offered prices need authorization

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&JsValue::from_str("inventory visual module loaded"));
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let message = format!("{}: {}", context, err);
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn parse_decimal(value: &str) -> Decimal {
    Decimal::from_str(value.trim()).unwrap_or(Decimal::ZERO)
}

/// Reconcile a JSON array of stock units against a JSON array of categories.
/// Returns the products as JSON, ordered by name.
#[wasm_bindgen]
pub fn reconcile_units(units_json: &str, categories_json: &str) -> Result<String, JsValue> {
    let units: Vec<StockUnit> =
        serde_json::from_str(units_json).map_err(|e| js_error("Invalid units JSON", e))?;
    let categories: Vec<Category> = serde_json::from_str(categories_json)
        .map_err(|e| js_error("Invalid categories JSON", e))?;

    let tree = CategoryTree::new(categories);
    let products = shared::sorted_by_name(shared::reconcile(&units, &tree));
    serde_json::to_string(&products).map_err(|e| js_error("Failed to encode products", e))
}

/// Plates covering `quantity` for plates of `height` x `width`.
/// Unparseable or non-positive dimensions give 0.
#[wasm_bindgen]
pub fn plates_for_quantity(quantity: &str, height: &str, width: &str) -> i64 {
    let area = plate_area(Some(parse_decimal(height)), Some(parse_decimal(width)));
    area.map_or(0, |area| plate_count(parse_decimal(quantity), area))
}

/// Expiry (RFC 3339) of a hold started at `start` (RFC 3339)
#[wasm_bindgen]
pub fn hold_expires_at(start: &str, business_days: u32) -> Result<String, JsValue> {
    let start: DateTime<Utc> = DateTime::parse_from_rfc3339(start)
        .map_err(|e| js_error("Invalid start date", e))?
        .with_timezone(&Utc);
    Ok(hold_expiration(start, business_days).to_rfc3339())
}

/// Whether any offered price (product id -> price) is below the product's
/// negotiated tier (product id -> tiers) in `currency` ("USD" or "MXN")
#[wasm_bindgen]
pub fn requires_price_authorization(
    offered_json: &str,
    tiers_json: &str,
    currency: &str,
) -> Result<bool, JsValue> {
    let offered: HashMap<ProductId, Decimal> =
        serde_json::from_str(offered_json).map_err(|e| js_error("Invalid offered prices", e))?;
    let tiers: HashMap<ProductId, ProductPrices> =
        serde_json::from_str(tiers_json).map_err(|e| js_error("Invalid price tiers", e))?;
    let currency = Currency::from_code(currency).unwrap_or_default();
    Ok(needs_authorization(&offered, &tiers, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_outside_browser() {
        init();
        assert_eq!(plates_for_quantity("4", "2", "1"), 2);
    }

    #[test]
    fn test_plates_for_quantity() {
        assert_eq!(plates_for_quantity("11", "2", "1"), 6);
        assert_eq!(plates_for_quantity("5", "2", "1"), 2);
        assert_eq!(plates_for_quantity("5", "0", "1"), 0);
        assert_eq!(plates_for_quantity("5", "abc", "1"), 0);
    }

    #[test]
    fn test_hold_expires_at() {
        // Thursday -> the following Thursday
        let expires = hold_expires_at("2024-05-02T10:00:00Z", 5).unwrap();
        assert_eq!(expires, "2024-05-09T10:00:00+00:00");
    }

    #[test]
    fn test_reconcile_units_json() {
        let units = r#"[
            {"id": "00000000-0000-0000-0000-000000000001",
             "product_id": "00000000-0000-0000-0000-0000000000aa",
             "product_name": "Carrara", "uom_name": "m²",
             "location_id": "00000000-0000-0000-0000-000000000010",
             "location_name": "WH/Stock", "location_class": "on_hand",
             "quantity": "10", "reserved_quantity": "4",
             "height": "2", "width": "1"},
            {"id": "00000000-0000-0000-0000-000000000002",
             "product_id": "00000000-0000-0000-0000-0000000000aa",
             "product_name": "Carrara", "uom_name": "m²",
             "location_id": "00000000-0000-0000-0000-000000000011",
             "location_name": "Transit", "location_class": "in_transit",
             "quantity": "6", "reserved_quantity": "0",
             "has_active_hold": true}
        ]"#;
        let json = reconcile_units(units, "[]").unwrap();
        let products: Vec<ProductAggregate> = serde_json::from_str(&json).unwrap();

        assert_eq!(products.len(), 1);
        let carrara = &products[0];
        assert_eq!(carrara.on_hand.stock, Decimal::from(10));
        assert_eq!(carrara.on_hand.committed, Decimal::from(4));
        assert_eq!(carrara.on_hand.available, Decimal::from(6));
        assert_eq!(carrara.in_transit.hold, Decimal::from(6));
        assert_eq!(carrara.in_transit.available, Decimal::ZERO);
        assert_eq!(carrara.plate_area, Decimal::from(2));
    }

    #[test]
    fn test_requires_price_authorization() {
        let product = "00000000-0000-0000-0000-0000000000aa";
        let tiers = format!(r#"{{"{}": {{"usd_medium": "100", "usd_minimum": "80"}}}}"#, product);
        let low = format!(r#"{{"{}": "95"}}"#, product);
        let ok = format!(r#"{{"{}": "100"}}"#, product);

        assert!(requires_price_authorization(&low, &tiers, "USD").unwrap());
        assert!(!requires_price_authorization(&ok, &tiers, "USD").unwrap());
    }
}
