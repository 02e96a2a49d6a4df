//! HTTP handlers for the inventory views

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{FilterRequest, GroupedInventory, UnitDetail, UnitId};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{FilterOptions, SaleOrderInfo};
use crate::services::InventoryService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UnitDetailsRequest {
    pub unit_ids: Vec<UnitId>,
    #[serde(default)]
    pub include_sales: bool,
}

#[derive(Debug, Deserialize)]
pub struct SaleOrderInfoRequest {
    pub order_ids: Vec<Uuid>,
}

/// Grouped inventory from a JSON object of filters
pub async fn get_grouped_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(filters): Json<serde_json::Map<String, serde_json::Value>>,
) -> AppResult<Json<GroupedInventory>> {
    let service = InventoryService::new(state.db);
    let request = FilterRequest::from_json(&filters);
    let result = service
        .get_grouped_inventory(&request, &current_user.0.capabilities())
        .await?;
    Ok(Json(result))
}

/// Grouped inventory from query string filters
pub async fn search_grouped_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<GroupedInventory>> {
    let service = InventoryService::new(state.db);
    let request = FilterRequest::from_pairs(params);
    let result = service
        .get_grouped_inventory(&request, &current_user.0.capabilities())
        .await?;
    Ok(Json(result))
}

/// Drill-down rows for the given units
pub async fn get_unit_details(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UnitDetailsRequest>,
) -> AppResult<Json<Vec<UnitDetail>>> {
    let service = InventoryService::new(state.db);
    let details = service
        .get_unit_details(
            &input.unit_ids,
            input.include_sales,
            &current_user.0.capabilities(),
        )
        .await?;
    Ok(Json(details))
}

pub async fn get_filter_options(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<FilterOptions>> {
    let service = InventoryService::new(state.db);
    let options = service
        .get_filter_options(&current_user.0.capabilities())
        .await?;
    Ok(Json(options))
}

pub async fn get_sale_order_info(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SaleOrderInfoRequest>,
) -> AppResult<Json<SaleOrderInfo>> {
    let service = InventoryService::new(state.db);
    let info = service
        .get_sale_order_info(&input.order_ids, &current_user.0.capabilities())
        .await?;
    Ok(Json(info))
}
