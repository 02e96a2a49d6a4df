//! Database models for the Stone Inventory Visual server
//!
//! Re-exports models from the shared crate and adds the row types the
//! storage queries decode into

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub use shared::models::*;
use shared::LocationClass;

/// Stock unit row joined with product, lot and location data
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockUnitRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_code: Option<String>,
    pub category_id: Option<Uuid>,
    pub uom_name: String,
    pub lot_id: Option<Uuid>,
    pub lot_name: Option<String>,
    pub location_id: Uuid,
    pub location_name: String,
    pub location_parent_path: String,
    pub location_usage: String,
    pub quantity: Decimal,
    pub reserved_quantity: Decimal,
    pub has_active_hold: bool,
    pub height: Option<Decimal>,
    pub width: Option<Decimal>,
    pub thickness: Option<Decimal>,
    pub stone_type: Option<String>,
    pub group_id: Option<Uuid>,
    pub finish: Option<String>,
    pub color: Option<String>,
    pub format: Option<String>,
    pub block: Option<String>,
    pub bundle: Option<String>,
    pub container: Option<String>,
    pub customs_declaration: Option<String>,
    pub supplier_reference: Option<String>,
}

impl From<StockUnitRow> for StockUnit {
    fn from(row: StockUnitRow) -> Self {
        StockUnit {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_code: row.product_code,
            category_id: row.category_id,
            uom_name: row.uom_name,
            lot_id: row.lot_id,
            lot_name: row.lot_name,
            location_id: row.location_id,
            location_name: row.location_name,
            location_parent_path: row.location_parent_path,
            location_class: LocationClass::from_usage(&row.location_usage),
            quantity: row.quantity,
            reserved_quantity: row.reserved_quantity,
            has_active_hold: row.has_active_hold,
            height: row.height,
            width: row.width,
            thickness: row.thickness,
            stone_type_label: row.stone_type.as_deref().map(stone_type_label),
            stone_type: row.stone_type,
            group_id: row.group_id,
            finish: row.finish,
            color: row.color,
            format: row.format,
            block: row.block,
            bundle: row.bundle,
            container: row.container,
            customs_declaration: row.customs_declaration,
            supplier_reference: row.supplier_reference,
        }
    }
}

/// Display label for a stored stone type code
pub fn stone_type_label(code: &str) -> String {
    match code {
        "marble" => "Mármol",
        "granite" => "Granito",
        "quartzite" => "Cuarcita",
        "onyx" => "Ónix",
        "travertine" => "Travertino",
        "limestone" => "Piedra caliza",
        "porcelain" => "Porcelánico",
        other => other,
    }
    .to_string()
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductPriceRow {
    pub id: Uuid,
    pub price_usd_1: Option<Decimal>,
    pub price_usd_2: Option<Decimal>,
    pub price_usd_3: Option<Decimal>,
    pub price_mxn_1: Option<Decimal>,
    pub price_mxn_2: Option<Decimal>,
    pub price_mxn_3: Option<Decimal>,
}

impl From<&ProductPriceRow> for ProductPrices {
    fn from(row: &ProductPriceRow) -> Self {
        ProductPrices {
            usd_high: row.price_usd_1,
            usd_medium: row.price_usd_2,
            usd_minimum: row.price_usd_3,
            mxn_high: row.price_mxn_1,
            mxn_medium: row.price_mxn_2,
            mxn_minimum: row.price_mxn_3,
        }
    }
}

/// Active hold joined with the names shown next to a unit
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HoldInfoRow {
    pub unit_id: Uuid,
    pub id: Uuid,
    pub partner_name: String,
    pub project_name: Option<String>,
    pub architect_name: Option<String>,
    pub seller_name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<HoldInfoRow> for HoldInfo {
    fn from(row: HoldInfoRow) -> Self {
        HoldInfo {
            id: row.id,
            partner_name: row.partner_name,
            project_name: row.project_name.unwrap_or_default(),
            architect_name: row.architect_name.unwrap_or_default(),
            seller_name: row.seller_name.unwrap_or_default(),
            starts_on: row.starts_at.format("%Y-%m-%d").to_string(),
            expires_on: row.expires_at.format("%Y-%m-%d").to_string(),
            notes: row.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartnerRow {
    pub id: Uuid,
    pub name: String,
    pub vat: Option<String>,
    pub reference: Option<String>,
    pub email: Option<String>,
}

impl From<PartnerRow> for Partner {
    fn from(row: PartnerRow) -> Self {
        let vat = row.vat.unwrap_or_default();
        let display_name = if vat.is_empty() {
            row.name.clone()
        } else {
            format!("{} ({})", row.name, vat)
        };
        Partner {
            id: row.id,
            name: row.name,
            display_name,
            vat,
            reference: row.reference.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MoveRow {
    pub date: Option<DateTime<Utc>>,
    pub source_name: String,
    pub source_usage: String,
    pub destination_name: String,
    pub destination_usage: String,
    pub quantity: Decimal,
    pub reference: Option<String>,
    pub user_name: Option<String>,
}

impl From<MoveRow> for MoveRecord {
    fn from(row: MoveRow) -> Self {
        MoveRecord {
            date: row.date,
            source_name: row.source_name,
            source_usage: row.source_usage,
            destination_name: row.destination_name,
            destination_usage: row.destination_usage,
            quantity: row.quantity,
            reference: row.reference.unwrap_or_default(),
            user_name: row.user_name.unwrap_or_default(),
        }
    }
}
