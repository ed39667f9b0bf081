//! Authentication endpoints.

use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use fasum_common::AppResult;
use fasum_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email address.
    pub identifier: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: user::Model,
}

/// Sign in with username or email.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (session, user) = state
        .auth_service
        .login(&req.identifier, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: session.token,
        expires_at: session.expires_at.to_rfc3339(),
        user,
    }))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Terminate the current session.
async fn logout(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<LogoutResponse>> {
    if let Some(token) = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        state.auth_service.sign_out(token).await?;
    }

    Ok(ApiResponse::ok(LogoutResponse { ok: true }))
}

/// The authenticated user's own profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<user::Model> {
    ApiResponse::ok(user)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", post(me))
}
