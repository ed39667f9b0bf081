//! Export endpoints.
//!
//! These return raw file downloads rather than the JSON envelope: the
//! dashboard hands the response straight to the browser.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Local;
use fasum_common::{AppError, AppResult};
use fasum_core::export::{self, ExportFile, ExportFormat};
use fasum_db::entities::report::{Priority, ReportStatus};
use fasum_db::repositories::ReportQuery;
use serde::Deserialize;

use crate::{extractors::StaffUser, middleware::AppState};

/// Export request. `format` is `csv` or `xlsx`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReportsRequest {
    pub format: String,
    pub status: Option<ReportStatus>,
    pub priority: Option<Priority>,
    pub category_id: Option<i32>,
}

/// Export request for facility types.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFacilityTypesRequest {
    pub format: String,
}

fn parse_format(s: &str) -> AppResult<ExportFormat> {
    ExportFormat::parse(s)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown export format: {s}")))
}

fn download(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

/// Export reports matching the filters as a download.
async fn export_reports(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<ExportReportsRequest>,
) -> AppResult<Response> {
    let format = parse_format(&req.format)?;

    let query = ReportQuery {
        status: req.status,
        priority: req.priority,
        category_id: req.category_id,
        // Exports cover the full matching set, not a page.
        limit: None,
        ..Default::default()
    };
    let rows = state.report_service.list(&query).await?;

    let sheet = export::report_sheet(&rows);
    let file = export::render(&sheet, format, Local::now().date_naive())?;

    tracing::info!(
        filename = %file.filename,
        rows = sheet.rows.len(),
        "Reports exported"
    );

    Ok(download(file))
}

/// Export all facility types as a download.
async fn export_facility_types(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<ExportFacilityTypesRequest>,
) -> AppResult<Response> {
    let format = parse_format(&req.format)?;

    let rows = state.taxonomy_service.list_facility_types(false).await?;

    let sheet = export::facility_type_sheet(&rows);
    let file = export::render(&sheet, format, Local::now().date_naive())?;

    tracing::info!(
        filename = %file.filename,
        rows = sheet.rows.len(),
        "Facility types exported"
    );

    Ok(download(file))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", post(export_reports))
        .route("/facility-types", post(export_facility_types))
}
