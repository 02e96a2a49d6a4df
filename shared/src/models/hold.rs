//! Manual hold (reservation) models

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Currency, PartnerId, ProductId, ProjectId, UnitId};

/// Lifecycle state of a hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldState {
    Active,
    Expired,
    Cancelled,
}

impl HoldState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldState::Active => "active",
            HoldState::Expired => "expired",
            HoldState::Cancelled => "cancelled",
        }
    }
}

/// Hold summary shown next to a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldInfo {
    pub id: Uuid,
    pub partner_name: String,
    pub project_name: String,
    pub architect_name: String,
    pub seller_name: String,
    /// YYYY-MM-DD
    pub starts_on: String,
    /// YYYY-MM-DD
    pub expires_on: String,
    pub notes: String,
}

/// Request to place a hold on a unit
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHoldInput {
    pub unit_id: UnitId,
    pub partner_id: PartnerId,
    pub project_id: Option<ProjectId>,
    pub architect_id: Option<PartnerId>,
    #[serde(default)]
    pub notes: String,
    /// Falls back to the configured default currency
    pub currency: Option<Currency>,
    /// Prices the seller offered, per product
    pub product_prices: Option<std::collections::HashMap<ProductId, Decimal>>,
}

/// Outcome of a hold request
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HoldOutcome {
    Created {
        hold_id: Uuid,
        expires_at: DateTime<Utc>,
        message: String,
    },
    AuthorizationRequired {
        needs_authorization: bool,
        authorization_id: Uuid,
        authorization_name: String,
        message: String,
    },
}

/// Expiry of a hold started at `start`: `business_days` weekdays later,
/// skipping Saturdays and Sundays, at the same time of day.
pub fn hold_expiration(start: DateTime<Utc>, business_days: u32) -> DateTime<Utc> {
    let mut expires = start;
    let mut added = 0;
    while added < business_days {
        expires += Duration::days(1);
        if !matches!(expires.weekday(), Weekday::Sat | Weekday::Sun) {
            added += 1;
        }
    }
    expires
}

/// Hold notes followed by the list of offered prices
pub fn compose_hold_notes(notes: &str, currency: Currency, priced: &[(String, Decimal)]) -> String {
    let mut full = notes.to_string();
    if priced.is_empty() {
        return full;
    }
    full.push_str(&format!("\n\n=== PRICES ({}) ===\n", currency));
    for (product_name, price) in priced {
        full.push_str(&format!(
            "• {}: {:.2} {}/m²\n",
            product_name, price, currency
        ));
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hold_expiration_skips_weekend() {
        // Thursday 2024-05-02 10:00
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let expires = hold_expiration(start, 5);
        // Fri, Mon, Tue, Wed, Thu
        assert_eq!(expires, Utc.with_ymd_and_hms(2024, 5, 9, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_hold_expiration_from_saturday() {
        let start = Utc.with_ymd_and_hms(2024, 5, 4, 8, 30, 0).unwrap();
        let expires = hold_expiration(start, 5);
        assert_eq!(expires, Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_hold_expiration_zero_days() {
        let start = Utc.with_ymd_and_hms(2024, 5, 4, 8, 30, 0).unwrap();
        assert_eq!(hold_expiration(start, 0), start);
    }

    #[test]
    fn test_compose_hold_notes() {
        let notes = compose_hold_notes(
            "Client visit",
            Currency::Usd,
            &[("Carrara 2cm".to_string(), Decimal::new(12550, 2))],
        );
        assert!(notes.starts_with("Client visit\n\n=== PRICES (USD) ===\n"));
        assert!(notes.contains("• Carrara 2cm: 125.50 USD/m²"));

        assert_eq!(compose_hold_notes("plain", Currency::Mxn, &[]), "plain");
    }
}
