//! Dashboard analytics endpoints.

use axum::{Json, Router, extract::State, routing::post};
use fasum_common::{AppError, AppResult};
use fasum_core::services::analytics::DEFAULT_WINDOW_DAYS;
use fasum_core::stats::{CategoryStat, DayBucket, Overview, ResolutionTime};
use serde::Deserialize;

use crate::{extractors::StaffUser, middleware::AppState, response::ApiResponse};

/// Status/priority overview of all reports.
async fn overview(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Overview>> {
    let overview = state.analytics_service.overview().await?;
    Ok(ApiResponse::ok(overview))
}

/// Per-category rollup.
async fn category_breakdown(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryStat>>> {
    let breakdown = state.analytics_service.category_breakdown().await?;
    Ok(ApiResponse::ok(breakdown))
}

/// Daily series request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeriesRequest {
    /// Trailing window length (default: 30, max: 365).
    pub window_days: Option<u32>,
}

/// Daily created/resolved/pending series over a trailing window.
async fn daily_series(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<DailySeriesRequest>,
) -> AppResult<ApiResponse<Vec<DayBucket>>> {
    let window_days = req.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if window_days == 0 || window_days > 365 {
        return Err(AppError::BadRequest(
            "windowDays must be between 1 and 365".to_string(),
        ));
    }

    let series = state.analytics_service.daily_series(window_days).await?;
    Ok(ApiResponse::ok(series))
}

/// Resolution-time statistics over resolved reports.
async fn resolution_time(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ResolutionTime>> {
    let stats = state.analytics_service.resolution_time().await?;
    Ok(ApiResponse::ok(stats))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", post(overview))
        .route("/categories", post(category_breakdown))
        .route("/daily", post(daily_series))
        .route("/resolution-time", post(resolution_time))
}
