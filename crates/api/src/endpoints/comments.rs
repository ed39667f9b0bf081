//! Report comment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use fasum_common::AppResult;
use fasum_db::entities::comment;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// List comments request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsRequest {
    pub report_id: i32,
}

/// List comments on a report, oldest first.
async fn list_comments(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListCommentsRequest>,
) -> AppResult<ApiResponse<Vec<comment::Model>>> {
    let comments = state.comment_service.list_for_report(req.report_id).await?;
    Ok(ApiResponse::ok(comments))
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub report_id: i32,
    pub body: String,
}

/// Add a comment to a report.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .create(&user.id, req.report_id, &req.body)
        .await?;
    Ok(ApiResponse::ok(comment))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_comments))
        .route("/create", post(create_comment))
}
