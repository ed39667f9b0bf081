//! Report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, FixedOffset};
use fasum_common::AppResult;
use fasum_core::{CreateReportInput, UpdateReportInput};
use fasum_db::entities::{
    category,
    report::{self, Priority, ReportStatus},
};
use fasum_db::repositories::ReportQuery;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    events::ChangeEvent,
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Report with its category joined, as the dashboard renders it.
///
/// Status and priority carry the NULL-reads-as-default rule already applied;
/// the raw nullable columns never reach the client.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub category: Option<category::Model>,
    pub priority: Priority,
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
    pub resolved_at: Option<String>,
    pub user_id: String,
    pub reported_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ReportResponse {
    fn new(report: report::Model, category: Option<category::Model>) -> Self {
        let image_urls = report
            .image_urls
            .as_array()
            .map(|urls| {
                urls.iter()
                    .filter_map(|u| u.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: report.id,
            title: report.title,
            description: report.description,
            image_urls,
            latitude: report.latitude,
            longitude: report.longitude,
            location_name: report.location_name,
            category,
            priority: report.priority.unwrap_or_default(),
            status: report.status.unwrap_or_default(),
            admin_notes: report.admin_notes,
            resolved_at: report.resolved_at.map(|t| t.to_rfc3339()),
            user_id: report.user_id,
            reported_by: report.reported_by,
            created_at: report.created_at.map(|t| t.to_rfc3339()),
            updated_at: report.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List reports request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsRequest {
    pub status: Option<ReportStatus>,
    pub priority: Option<Priority>,
    pub category_id: Option<i32>,
    /// Substring search over title and description.
    pub search: Option<String>,
    pub created_gte: Option<DateTime<FixedOffset>>,
    pub created_lte: Option<DateTime<FixedOffset>>,
    /// Maximum results (default: 50, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    50
}

/// List reports with filters and pagination.
async fn list_reports(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<ListReportsRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let query = ReportQuery {
        status: req.status,
        priority: req.priority,
        category_id: req.category_id,
        search: req.search,
        created_gte: req.created_gte,
        created_lte: req.created_lte,
        limit: Some(req.limit.min(100)),
        offset: req.offset,
    };

    let rows = state.report_service.list(&query).await?;

    Ok(ApiResponse::ok(
        rows.into_iter()
            .map(|(r, c)| ReportResponse::new(r, c))
            .collect(),
    ))
}

/// Show report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowReportRequest {
    pub report_id: i32,
}

/// Get a single report.
async fn show_report(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<ShowReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let (report, category) = state.report_service.get_with_category(req.report_id).await?;
    Ok(ApiResponse::ok(ReportResponse::new(report, category)))
}

/// Create report request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub category_id: Option<i32>,
    pub priority: Option<Priority>,
    /// Set when a staff member files on behalf of a citizen.
    pub reported_by: Option<String>,
}

/// Create a new report.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    req.validate()?;

    let input = CreateReportInput {
        title: req.title,
        description: req.description,
        image_urls: req.image_urls,
        latitude: req.latitude,
        longitude: req.longitude,
        location_name: req.location_name,
        category_id: req.category_id,
        priority: req.priority,
        reported_by: req.reported_by,
    };

    let report = state.report_service.create(&user.id, input).await?;
    state
        .broadcaster
        .broadcast(ChangeEvent::ReportCreated { id: report.id });

    Ok(ApiResponse::ok(ReportResponse::new(report, None)))
}

/// Update report request. Absent fields are left untouched; `null` clears a
/// nullable field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    pub report_id: i32,
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub image_urls: Option<Vec<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub category_id: Option<Option<i32>>,
    pub priority: Option<Priority>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub admin_notes: Option<Option<String>>,
}

/// Update report content fields.
async fn update_report(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let input = UpdateReportInput {
        title: req.title,
        description: req.description,
        image_urls: req.image_urls,
        location_name: req.location_name,
        category_id: req.category_id,
        priority: req.priority,
        admin_notes: req.admin_notes,
    };

    let report = state.report_service.update(req.report_id, input).await?;
    state
        .broadcaster
        .broadcast(ChangeEvent::ReportUpdated { id: report.id });

    let (report, category) = state.report_service.get_with_category(report.id).await?;
    Ok(ApiResponse::ok(ReportResponse::new(report, category)))
}

/// Update status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub report_id: i32,
    pub status: ReportStatus,
}

/// Move a report to a new workflow status.
async fn update_status(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .update_status(req.report_id, req.status)
        .await?;
    state
        .broadcaster
        .broadcast(ChangeEvent::ReportUpdated { id: report.id });

    let (report, category) = state.report_service.get_with_category(report.id).await?;
    Ok(ApiResponse::ok(ReportResponse::new(report, category)))
}

/// Delete report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReportRequest {
    pub report_id: i32,
}

/// Delete a report.
async fn delete_report(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteReportRequest>,
) -> AppResult<ApiResponse<()>> {
    state.report_service.delete(req.report_id).await?;
    state
        .broadcaster
        .broadcast(ChangeEvent::ReportDeleted { id: req.report_id });

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_reports))
        .route("/show", post(show_report))
        .route("/create", post(create_report))
        .route("/update", post(update_report))
        .route("/update-status", post(update_status))
        .route("/delete", post(delete_report))
}
