pub mod claims;
pub mod fines;
pub mod health;
pub mod reports;
pub mod vehicles;

use vehiclix_auth::role::UserRole;
use vehiclix_storage::error::StorageError;

use crate::error::ApiError;
use crate::state::AppState;

/// Roles allowed to create and edit fleet records.
pub(crate) const EDITORS: &[UserRole] = &[UserRole::Admin, UserRole::InsuranceProvider];
pub(crate) const ADMINS: &[UserRole] = &[UserRole::Admin];

/// A body that names an id must name the one in the path.
pub(crate) fn check_body_id(path_id: u64, body_id: Option<u64>) -> Result<(), ApiError> {
    match body_id {
        Some(id) if id != path_id => Err(ApiError::BadRequest(format!(
            "id mismatch: path has {path_id}, body has {id}"
        ))),
        _ => Ok(()),
    }
}

/// Claims and fines must point at an existing vehicle.
pub(crate) async fn ensure_vehicle(state: &AppState, vehicle_id: u64) -> Result<(), ApiError> {
    match state.fleet.get_vehicle(vehicle_id).await {
        Ok(_) => Ok(()),
        Err(StorageError::NotFound { .. }) => {
            Err(ApiError::BadRequest("vehicle not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
