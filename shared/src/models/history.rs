//! Lot history: movements, reservations, deliveries and purchases

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement relative to internal locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Incoming,
    Outgoing,
    Transfer,
}

impl MovementKind {
    /// Classify by the usage of source and destination locations
    pub fn classify(source_usage: &str, destination_usage: &str) -> Self {
        let from_internal = source_usage == "internal";
        let to_internal = destination_usage == "internal";
        match (from_internal, to_internal) {
            (false, true) => MovementKind::Incoming,
            (true, false) => MovementKind::Outgoing,
            _ => MovementKind::Transfer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Incoming => "Entrada",
            MovementKind::Outgoing => "Salida",
            MovementKind::Transfer => "Transferencia",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MovementKind::Incoming => "fa-arrow-down",
            MovementKind::Outgoing => "fa-arrow-up",
            MovementKind::Transfer => "fa-arrow-right",
        }
    }
}

/// A move line touching the lot, as read from storage
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub date: Option<DateTime<Utc>>,
    pub source_name: String,
    pub source_usage: String,
    pub destination_name: String,
    pub destination_usage: String,
    pub quantity: Decimal,
    pub reference: String,
    pub user_name: String,
}

/// Movement row of the history dialog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub date: String,
    pub kind: MovementKind,
    pub label: String,
    pub icon: String,
    pub source: String,
    pub destination: String,
    pub quantity: Decimal,
    pub reference: String,
    pub user_name: String,
}

impl From<&MoveRecord> for Movement {
    fn from(record: &MoveRecord) -> Self {
        let kind = MovementKind::classify(&record.source_usage, &record.destination_usage);
        Movement {
            date: record
                .date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            kind,
            label: kind.label().to_string(),
            icon: kind.icon().to_string(),
            source: record.source_name.clone(),
            destination: record.destination_name.clone(),
            quantity: record.quantity,
            reference: record.reference.clone(),
            user_name: record.user_name.clone(),
        }
    }
}

/// General information about the lot behind a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotGeneralInfo {
    pub product_name: String,
    pub product_code: String,
    pub lot_name: String,
    pub created_on: String,
    pub current_location: String,
    pub quantity: Decimal,
    pub reserved_quantity: Decimal,
    pub available_quantity: Decimal,
}

/// Counters shown at the top of the history dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotStatistics {
    pub total_movements: usize,
    pub total_incoming: usize,
    pub total_outgoing: usize,
    pub total_holds: usize,
    pub total_deliveries: usize,
    pub days_in_inventory: i64,
}

impl LotStatistics {
    pub fn from_moves(
        moves: &[MoveRecord],
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        LotStatistics {
            total_movements: moves.len(),
            total_incoming: moves
                .iter()
                .filter(|m| m.destination_usage == "internal")
                .count(),
            total_outgoing: moves.iter().filter(|m| m.source_usage == "internal").count(),
            total_holds: 0,
            total_deliveries: 0,
            days_in_inventory: created_at
                .map(|c| (now - c).num_days().max(0))
                .unwrap_or(0),
        }
    }
}

/// Past or current hold on the lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub partner_name: String,
    pub starts_on: String,
    pub expires_on: String,
    pub state: String,
    pub notes: String,
}

/// Outgoing delivery that carried the lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub reference: String,
    pub customer_name: String,
    pub scheduled_on: String,
    pub done_on: String,
    pub quantity: Decimal,
    pub source: String,
    pub state: String,
}

/// Recent purchase of the lot's product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInfo {
    pub order_name: String,
    pub supplier_name: String,
    pub ordered_on: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub currency_symbol: String,
    pub state: String,
}

/// Full history of the lot behind a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotHistory {
    pub general_info: LotGeneralInfo,
    pub statistics: LotStatistics,
    pub purchase_info: Vec<PurchaseInfo>,
    pub has_purchase_permissions: bool,
    pub movements: Vec<Movement>,
    pub reservations: Vec<Reservation>,
    pub deliveries: Vec<Delivery>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(source: &str, destination: &str) -> MoveRecord {
        MoveRecord {
            date: None,
            source_name: "A".to_string(),
            source_usage: source.to_string(),
            destination_name: "B".to_string(),
            destination_usage: destination.to_string(),
            quantity: Decimal::from(3),
            reference: String::new(),
            user_name: String::new(),
        }
    }

    #[test]
    fn test_movement_classification() {
        assert_eq!(MovementKind::classify("supplier", "internal"), MovementKind::Incoming);
        assert_eq!(MovementKind::classify("internal", "customer"), MovementKind::Outgoing);
        assert_eq!(MovementKind::classify("internal", "internal"), MovementKind::Transfer);
        assert_eq!(MovementKind::classify("transit", "customer"), MovementKind::Transfer);
        assert_eq!(MovementKind::Incoming.label(), "Entrada");
    }

    #[test]
    fn test_statistics_from_moves() {
        let moves = vec![
            record("supplier", "internal"),
            record("internal", "internal"),
            record("internal", "customer"),
        ];
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 11, 12, 0, 0).unwrap();
        let stats = LotStatistics::from_moves(&moves, Some(created), now);

        assert_eq!(stats.total_movements, 3);
        assert_eq!(stats.total_incoming, 2);
        assert_eq!(stats.total_outgoing, 2);
        assert_eq!(stats.days_in_inventory, 10);
    }

    #[test]
    fn test_movement_from_record_formats_date() {
        let mut rec = record("supplier", "internal");
        rec.date = Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap());
        let movement = Movement::from(&rec);
        assert_eq!(movement.date, "2024-03-05 14:07");
        assert_eq!(movement.kind, MovementKind::Incoming);
        assert_eq!(movement.icon, "fa-arrow-down");
    }
}
