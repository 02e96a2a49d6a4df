//! Price authorization requests

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductPrices;
use crate::types::{Currency, PartnerId, ProductId, ProjectId, UnitId};

/// What the authorized price will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[default]
    Hold,
    Sale,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Hold => "hold",
            OperationType::Sale => "sale",
        }
    }
}

/// A lot included in an authorization request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLot {
    pub unit_id: UnitId,
    pub lot_name: String,
    pub quantity: Decimal,
}

/// Lots of one product the seller wants to price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductGroup {
    pub name: String,
    pub lots: Vec<GroupLot>,
    pub total_quantity: Decimal,
}

/// Request to authorize prices below the negotiated tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuthorizationInput {
    #[serde(default)]
    pub operation_type: OperationType,
    pub partner_id: PartnerId,
    pub project_id: Option<ProjectId>,
    pub architect_id: Option<PartnerId>,
    pub selected_units: Vec<UnitId>,
    /// Falls back to the configured default currency
    pub currency: Option<Currency>,
    pub product_prices: HashMap<ProductId, Decimal>,
    pub product_groups: HashMap<ProductId, ProductGroup>,
    pub notes: Option<String>,
}

/// One line of an authorization, ready to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationLineDraft {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub lot_count: i32,
    pub requested_price: Decimal,
    pub authorized_price: Decimal,
    pub medium_price: Decimal,
    pub minimum_price: Decimal,
}

/// Created authorization header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCreated {
    pub authorization_id: Uuid,
    pub authorization_name: String,
}

/// Whether any offered price is below the product's negotiated tier
pub fn needs_authorization(
    requested: &HashMap<ProductId, Decimal>,
    prices: &HashMap<ProductId, ProductPrices>,
    currency: Currency,
) -> bool {
    requested.iter().any(|(product_id, price)| {
        let medium = prices
            .get(product_id)
            .map(|p| p.medium(currency))
            .unwrap_or(Decimal::ZERO);
        *price < medium
    })
}

/// Build one line per product group. Lines are ordered by product id so the
/// same request always persists the same way.
pub fn build_authorization_lines(
    groups: &HashMap<ProductId, ProductGroup>,
    requested: &HashMap<ProductId, Decimal>,
    prices: &HashMap<ProductId, ProductPrices>,
    currency: Currency,
) -> Vec<AuthorizationLineDraft> {
    let mut product_ids: Vec<&ProductId> = groups.keys().collect();
    product_ids.sort();

    product_ids
        .into_iter()
        .map(|product_id| {
            let group = &groups[product_id];
            let tiers = prices.get(product_id).copied().unwrap_or_default();
            let requested_price = requested.get(product_id).copied().unwrap_or(Decimal::ZERO);
            AuthorizationLineDraft {
                product_id: *product_id,
                quantity: group.total_quantity,
                lot_count: group.lots.len() as i32,
                requested_price,
                authorized_price: requested_price,
                medium_price: tiers.medium(currency),
                minimum_price: tiers.minimum(currency),
            }
        })
        .collect()
}

/// Sequence-based display name, e.g. "PA/00042"
pub fn authorization_name(sequence: i64) -> String {
    format!("PA/{:05}", sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(medium: i64, minimum: i64) -> ProductPrices {
        ProductPrices {
            usd_medium: Some(Decimal::from(medium)),
            usd_minimum: Some(Decimal::from(minimum)),
            ..Default::default()
        }
    }

    #[test]
    fn test_needs_authorization_below_medium() {
        let product = Uuid::new_v4();
        let tiers = HashMap::from([(product, prices(100, 80))]);

        let at_medium = HashMap::from([(product, Decimal::from(100))]);
        assert!(!needs_authorization(&at_medium, &tiers, Currency::Usd));

        let below = HashMap::from([(product, Decimal::from(95))]);
        assert!(needs_authorization(&below, &tiers, Currency::Usd));

        // No MXN tier configured: medium reads as zero
        assert!(!needs_authorization(&below, &tiers, Currency::Mxn));
    }

    #[test]
    fn test_build_lines() {
        let product = Uuid::new_v4();
        let group = ProductGroup {
            name: "Carrara".to_string(),
            lots: vec![
                GroupLot {
                    unit_id: Uuid::new_v4(),
                    lot_name: "L1".to_string(),
                    quantity: Decimal::from(4),
                },
                GroupLot {
                    unit_id: Uuid::new_v4(),
                    lot_name: "L2".to_string(),
                    quantity: Decimal::from(5),
                },
            ],
            total_quantity: Decimal::from(9),
        };
        let lines = build_authorization_lines(
            &HashMap::from([(product, group)]),
            &HashMap::from([(product, Decimal::from(90))]),
            &HashMap::from([(product, prices(100, 80))]),
            Currency::Usd,
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].lot_count, 2);
        assert_eq!(lines[0].quantity, Decimal::from(9));
        assert_eq!(lines[0].requested_price, Decimal::from(90));
        assert_eq!(lines[0].authorized_price, Decimal::from(90));
        assert_eq!(lines[0].medium_price, Decimal::from(100));
        assert_eq!(lines[0].minimum_price, Decimal::from(80));
    }

    #[test]
    fn test_authorization_name() {
        assert_eq!(authorization_name(42), "PA/00042");
    }
}
