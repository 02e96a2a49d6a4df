//! HTTP handlers for holds and price authorizations

use axum::{extract::State, Json};
use shared::{AuthorizationCreated, CreateAuthorizationInput, CreateHoldInput, HoldOutcome};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{AuthorizationService, HoldService};
use crate::AppState;

/// Place a hold, or request authorization when the offered price is too low
pub async fn create_hold(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateHoldInput>,
) -> AppResult<Json<HoldOutcome>> {
    let service = HoldService::new(state.db);
    let outcome = service
        .create_hold(
            current_user.0.user_id,
            input,
            &current_user.0.capabilities(),
            &state.config.inventory,
        )
        .await?;
    Ok(Json(outcome))
}

pub async fn create_price_authorization(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateAuthorizationInput>,
) -> AppResult<Json<AuthorizationCreated>> {
    let service = AuthorizationService::new(state.db);
    let created = service
        .create_price_authorization(
            current_user.0.user_id,
            input,
            &current_user.0.capabilities(),
            &state.config.inventory,
        )
        .await?;
    Ok(Json(created))
}
