//! Notification endpoints.

use axum::{Json, Router, extract::State, routing::post};
use fasum_common::AppResult;
use fasum_db::entities::notification;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// List notifications request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsRequest {
    /// Maximum results (default: 20, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Get the authenticated user's notifications, newest first.
async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListNotificationsRequest>,
) -> AppResult<ApiResponse<Vec<notification::Model>>> {
    let notifications = state
        .notification_service
        .list(&user.id, req.limit.min(100), req.offset)
        .await?;
    Ok(ApiResponse::ok(notifications))
}

/// Mark as read request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadRequest {
    pub notification_id: i32,
}

/// Mark one notification as read.
async fn mark_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<MarkAsReadRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .mark_read(&user.id, req.notification_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Mark all as read response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllAsReadResponse {
    pub count: u64,
}

/// Mark all of the user's notifications as read.
async fn mark_all_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllAsReadResponse>> {
    let count = state.notification_service.mark_all_read(&user.id).await?;
    Ok(ApiResponse::ok(MarkAllAsReadResponse { count }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_notifications))
        .route("/mark-read", post(mark_as_read))
        .route("/mark-all-read", post(mark_all_as_read))
}
