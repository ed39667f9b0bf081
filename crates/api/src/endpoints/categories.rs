//! Category endpoints.

use axum::{Json, Router, extract::State, routing::post};
use fasum_common::AppResult;
use fasum_core::{CreateTaxonomyInput, UpdateTaxonomyInput};
use fasum_db::entities::category;
use serde::Deserialize;

use crate::{
    events::ChangeEvent,
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

/// List categories request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCategoriesRequest {
    /// Exclude soft-disabled entries, as in new-report pickers.
    #[serde(default)]
    pub active_only: bool,
}

/// List categories. Available to every authenticated user.
async fn list_categories(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListCategoriesRequest>,
) -> AppResult<ApiResponse<Vec<category::Model>>> {
    let categories = state
        .taxonomy_service
        .list_categories(req.active_only)
        .await?;
    Ok(ApiResponse::ok(categories))
}

/// Show category request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowCategoryRequest {
    pub category_id: i32,
}

/// Get a single category.
async fn show_category(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowCategoryRequest>,
) -> AppResult<ApiResponse<category::Model>> {
    let category = state.taxonomy_service.get_category(req.category_id).await?;
    Ok(ApiResponse::ok(category))
}

/// Create category request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Create a category.
async fn create_category(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<ApiResponse<category::Model>> {
    let category = state
        .taxonomy_service
        .create_category(CreateTaxonomyInput {
            name: req.name,
            icon: req.icon,
            color: req.color,
        })
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(category))
}

/// Update category request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub category_id: i32,
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub color: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Update a category.
async fn update_category(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateCategoryRequest>,
) -> AppResult<ApiResponse<category::Model>> {
    let category = state
        .taxonomy_service
        .update_category(
            req.category_id,
            UpdateTaxonomyInput {
                name: req.name,
                icon: req.icon,
                color: req.color,
                is_active: req.is_active,
            },
        )
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(category))
}

/// Disable category request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisableCategoryRequest {
    pub category_id: i32,
}

/// Soft-disable a category. Historical reports keep referencing it.
async fn disable_category(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<DisableCategoryRequest>,
) -> AppResult<ApiResponse<category::Model>> {
    let category = state
        .taxonomy_service
        .disable_category(req.category_id)
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(category))
}

/// Delete category request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryRequest {
    pub category_id: i32,
}

/// Hard-delete a category. Reports referencing it fall back to
/// uncategorized.
async fn delete_category(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteCategoryRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .taxonomy_service
        .delete_category(req.category_id)
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_categories))
        .route("/show", post(show_category))
        .route("/create", post(create_category))
        .route("/update", post(update_category))
        .route("/disable", post(disable_category))
        .route("/delete", post(delete_category))
}
