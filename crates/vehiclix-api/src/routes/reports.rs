use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;

use vehiclix_auth::role::Principal;
use vehiclix_core::models::report::Report;

use super::ADMINS;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    #[serde(rename = "type")]
    pub report_type: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: String,
}

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>, ApiError> {
    Ok(Json(state.reports.list().await?))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Report>, ApiError> {
    Ok(Json(state.reports.get(id).await?))
}

/// Queue a report. Responds immediately with the `Pending` record; clients
/// poll the `Location` until it reaches a terminal status.
pub async fn create_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(req): ApiJson<CreateReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_any(ADMINS)?;

    let report = state
        .reports
        .submit(&req.report_type, req.parameters, Some(principal.name))
        .await?;

    let location = format!("/api/report/{}", report.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(report)))
}

/// Download a completed report as CSV, XLSX or PDF.
pub async fn export_report(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.reports.export(id, &query.format).await?;

    let headers = [
        (CONTENT_TYPE, file.content_type.to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];
    Ok((headers, file.bytes))
}
