use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use vehiclix_auth::role::Principal;
use vehiclix_core::models::vehicle::{Vehicle, VehicleDraft};

use super::{ADMINS, EDITORS, check_body_id};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, ApiError> {
    Ok(Json(state.fleet.list_vehicles().await?))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vehicle>, ApiError> {
    Ok(Json(state.fleet.get_vehicle(id).await?))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(draft): ApiJson<VehicleDraft>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    principal.require_any(EDITORS)?;
    draft.validate()?;

    let vehicle = state
        .fleet
        .insert_vehicle(draft, Some(principal.name))
        .await?;
    tracing::info!(id = vehicle.id, vin = %vehicle.vin, "vehicle created");
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<u64>,
    ApiJson(draft): ApiJson<VehicleDraft>,
) -> Result<StatusCode, ApiError> {
    principal.require_any(EDITORS)?;
    check_body_id(id, draft.id)?;
    draft.validate()?;

    state
        .fleet
        .update_vehicle(id, draft, Some(principal.name))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    principal.require_any(ADMINS)?;
    state.fleet.delete_vehicle(id).await?;
    tracing::info!(id, "vehicle deleted");
    Ok(StatusCode::NO_CONTENT)
}
