//! HTTP handlers for customer, architect and project lookups

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{CreatePartnerInput, CreateProjectInput, Partner, Project};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::PartnerService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

fn partner_service(state: &AppState) -> PartnerService {
    PartnerService::new(state.db.clone(), state.config.inventory.lookup_limit)
}

pub async fn search_customers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Partner>>> {
    let partners = partner_service(&state)
        .search_customers(&query.q, &current_user.0.capabilities())
        .await?;
    Ok(Json(partners))
}

pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePartnerInput>,
) -> AppResult<Json<Partner>> {
    let partner = partner_service(&state)
        .create_customer(input, &current_user.0.capabilities())
        .await?;
    Ok(Json(partner))
}

pub async fn search_architects(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Partner>>> {
    let partners = partner_service(&state)
        .search_architects(&query.q, &current_user.0.capabilities())
        .await?;
    Ok(Json(partners))
}

pub async fn create_architect(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePartnerInput>,
) -> AppResult<Json<Partner>> {
    let partner = partner_service(&state)
        .create_architect(input, &current_user.0.capabilities())
        .await?;
    Ok(Json(partner))
}

pub async fn search_projects(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = partner_service(&state)
        .search_projects(&query.q, &current_user.0.capabilities())
        .await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProjectInput>,
) -> AppResult<Json<Project>> {
    let project = partner_service(&state)
        .create_project(input, &current_user.0.capabilities())
        .await?;
    Ok(Json(project))
}
