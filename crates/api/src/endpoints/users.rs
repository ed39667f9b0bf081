//! User management endpoints. Admin only.

use axum::{Json, Router, extract::State, routing::post};
use fasum_common::{AppError, AppResult};
use fasum_core::{CreateUserInput, UpdateUserInput};
use fasum_db::entities::user::{self, UserRole};
use serde::Deserialize;
use validator::Validate;

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

/// List users request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    pub role: Option<UserRole>,
    /// Maximum results (default: 50, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    50
}

/// List user accounts.
async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<ListUsersRequest>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    let users = state
        .user_service
        .list(req.role, req.limit.min(100), req.offset)
        .await?;
    Ok(ApiResponse::ok(users))
}

/// Show user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserRequest {
    pub user_id: String,
}

/// Get a single user.
async fn show_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<ShowUserRequest>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.get(&req.user_id).await?;
    Ok(ApiResponse::ok(user))
}

/// Create user request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// Create a user account.
async fn create_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<ApiResponse<user::Model>> {
    req.validate()?;

    let user = state
        .user_service
        .create(CreateUserInput {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            role: req.role,
        })
        .await?;

    Ok(ApiResponse::ok(user))
}

/// Update user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_id: String,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub full_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub avatar_url: Option<Option<String>>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

/// Update a user's profile, role, or password.
async fn update_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<ApiResponse<user::Model>> {
    // An admin may not demote themselves; another admin has to do it.
    if req.user_id == admin.id {
        if let Some(role) = &req.role {
            if *role != UserRole::Admin {
                return Err(AppError::Forbidden(
                    "Cannot change your own role".to_string(),
                ));
            }
        }
    }

    let user = state
        .user_service
        .update(
            &req.user_id,
            UpdateUserInput {
                full_name: req.full_name,
                avatar_url: req.avatar_url,
                role: req.role,
                password: req.password,
            },
        )
        .await?;

    Ok(ApiResponse::ok(user))
}

/// Delete user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: String,
}

/// Delete a user account.
async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteUserRequest>,
) -> AppResult<ApiResponse<()>> {
    if req.user_id == admin.id {
        return Err(AppError::Forbidden(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.user_service.delete(&req.user_id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_users))
        .route("/show", post(show_user))
        .route("/create", post(create_user))
        .route("/update", post(update_user))
        .route("/delete", post(delete_user))
}
