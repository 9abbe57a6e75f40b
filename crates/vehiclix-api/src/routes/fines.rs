use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use vehiclix_auth::role::Principal;
use vehiclix_core::models::fine::{Fine, FineDraft};

use super::{ADMINS, EDITORS, check_body_id, ensure_vehicle};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn list_fines(State(state): State<AppState>) -> Result<Json<Vec<Fine>>, ApiError> {
    Ok(Json(state.fleet.list_fines().await?))
}

pub async fn list_vehicle_fines(
    State(state): State<AppState>,
    Path(vehicle_id): Path<u64>,
) -> Result<Json<Vec<Fine>>, ApiError> {
    let fines = state
        .fleet
        .list_fines()
        .await?
        .into_iter()
        .filter(|f| f.vehicle_id == vehicle_id)
        .collect();
    Ok(Json(fines))
}

pub async fn get_fine(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Fine>, ApiError> {
    Ok(Json(state.fleet.get_fine(id).await?))
}

pub async fn create_fine(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(draft): ApiJson<FineDraft>,
) -> Result<(StatusCode, Json<Fine>), ApiError> {
    principal.require_any(EDITORS)?;
    draft.validate()?;
    ensure_vehicle(&state, draft.vehicle_id).await?;

    let fine = state.fleet.insert_fine(draft, Some(principal.name)).await?;
    tracing::info!(id = fine.id, vehicle_id = fine.vehicle_id, "fine created");
    Ok((StatusCode::CREATED, Json(fine)))
}

pub async fn update_fine(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<u64>,
    ApiJson(draft): ApiJson<FineDraft>,
) -> Result<StatusCode, ApiError> {
    principal.require_any(EDITORS)?;
    check_body_id(id, draft.id)?;
    state.fleet.get_fine(id).await?;
    draft.validate()?;
    ensure_vehicle(&state, draft.vehicle_id).await?;

    state
        .fleet
        .update_fine(id, draft, Some(principal.name))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_fine(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    principal.require_any(ADMINS)?;
    state.fleet.delete_fine(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
