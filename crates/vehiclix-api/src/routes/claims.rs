use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use vehiclix_auth::role::Principal;
use vehiclix_core::models::claim::{Claim, ClaimDraft};

use super::{ADMINS, EDITORS, check_body_id, ensure_vehicle};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn list_claims(State(state): State<AppState>) -> Result<Json<Vec<Claim>>, ApiError> {
    Ok(Json(state.fleet.list_claims().await?))
}

pub async fn list_vehicle_claims(
    State(state): State<AppState>,
    Path(vehicle_id): Path<u64>,
) -> Result<Json<Vec<Claim>>, ApiError> {
    let claims = state
        .fleet
        .list_claims()
        .await?
        .into_iter()
        .filter(|c| c.vehicle_id == vehicle_id)
        .collect();
    Ok(Json(claims))
}

pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Claim>, ApiError> {
    Ok(Json(state.fleet.get_claim(id).await?))
}

pub async fn create_claim(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(draft): ApiJson<ClaimDraft>,
) -> Result<(StatusCode, Json<Claim>), ApiError> {
    principal.require_any(EDITORS)?;
    draft.validate()?;
    ensure_vehicle(&state, draft.vehicle_id).await?;

    let claim = state.fleet.insert_claim(draft, Some(principal.name)).await?;
    tracing::info!(id = claim.id, vehicle_id = claim.vehicle_id, "claim created");
    Ok((StatusCode::CREATED, Json(claim)))
}

pub async fn update_claim(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<u64>,
    ApiJson(draft): ApiJson<ClaimDraft>,
) -> Result<StatusCode, ApiError> {
    principal.require_any(EDITORS)?;
    check_body_id(id, draft.id)?;
    state.fleet.get_claim(id).await?;
    draft.validate()?;
    ensure_vehicle(&state, draft.vehicle_id).await?;

    state
        .fleet
        .update_claim(id, draft, Some(principal.name))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_claim(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    principal.require_any(ADMINS)?;
    state.fleet.delete_claim(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
