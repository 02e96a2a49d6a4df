//! HTTP handlers for lot history, photos and notes

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{LotHistory, LotNotes, LotPhotos, SaveLotNotesInput, SaveLotPhotoInput, SaveResult};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::LotService;
use crate::AppState;

/// History of the lot behind a unit
pub async fn get_lot_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<LotHistory>> {
    let service = LotService::new(state.db);
    let history = service
        .get_lot_history(unit_id, &current_user.0.capabilities())
        .await?;
    Ok(Json(history))
}

pub async fn get_lot_photos(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<LotPhotos>> {
    let service = LotService::new(state.db);
    let photos = service
        .get_lot_photos(unit_id, &current_user.0.capabilities())
        .await?;
    Ok(Json(photos))
}

pub async fn save_lot_photo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<SaveLotPhotoInput>,
) -> AppResult<Json<SaveResult>> {
    let service = LotService::new(state.db);
    let result = service
        .save_lot_photo(unit_id, input, &current_user.0.capabilities())
        .await?;
    Ok(Json(result))
}

pub async fn get_lot_notes(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<LotNotes>> {
    let service = LotService::new(state.db);
    let notes = service
        .get_lot_notes(unit_id, &current_user.0.capabilities())
        .await?;
    Ok(Json(notes))
}

pub async fn save_lot_notes(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<SaveLotNotesInput>,
) -> AppResult<Json<SaveResult>> {
    let service = LotService::new(state.db);
    let result = service
        .save_lot_notes(unit_id, input, &current_user.0.capabilities())
        .await?;
    Ok(Json(result))
}
