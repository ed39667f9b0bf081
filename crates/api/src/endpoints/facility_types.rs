//! Facility-type endpoints.

use axum::{Json, Router, extract::State, routing::post};
use fasum_common::AppResult;
use fasum_core::{CreateTaxonomyInput, UpdateTaxonomyInput};
use fasum_db::entities::facility_type;
use serde::Deserialize;

use crate::{
    events::ChangeEvent,
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

/// List facility types request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFacilityTypesRequest {
    #[serde(default)]
    pub active_only: bool,
}

/// List facility types.
async fn list_facility_types(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListFacilityTypesRequest>,
) -> AppResult<ApiResponse<Vec<facility_type::Model>>> {
    let types = state
        .taxonomy_service
        .list_facility_types(req.active_only)
        .await?;
    Ok(ApiResponse::ok(types))
}

/// Show facility type request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowFacilityTypeRequest {
    pub facility_type_id: i32,
}

/// Get a single facility type.
async fn show_facility_type(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowFacilityTypeRequest>,
) -> AppResult<ApiResponse<facility_type::Model>> {
    let facility_type = state
        .taxonomy_service
        .get_facility_type(req.facility_type_id)
        .await?;
    Ok(ApiResponse::ok(facility_type))
}

/// Create facility type request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityTypeRequest {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Create a facility type.
async fn create_facility_type(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<CreateFacilityTypeRequest>,
) -> AppResult<ApiResponse<facility_type::Model>> {
    let facility_type = state
        .taxonomy_service
        .create_facility_type(CreateTaxonomyInput {
            name: req.name,
            icon: req.icon,
            color: req.color,
        })
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(facility_type))
}

/// Update facility type request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacilityTypeRequest {
    pub facility_type_id: i32,
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub color: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Update a facility type.
async fn update_facility_type(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateFacilityTypeRequest>,
) -> AppResult<ApiResponse<facility_type::Model>> {
    let facility_type = state
        .taxonomy_service
        .update_facility_type(
            req.facility_type_id,
            UpdateTaxonomyInput {
                name: req.name,
                icon: req.icon,
                color: req.color,
                is_active: req.is_active,
            },
        )
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(facility_type))
}

/// Disable facility type request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisableFacilityTypeRequest {
    pub facility_type_id: i32,
}

/// Soft-disable a facility type.
async fn disable_facility_type(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<DisableFacilityTypeRequest>,
) -> AppResult<ApiResponse<facility_type::Model>> {
    let facility_type = state
        .taxonomy_service
        .disable_facility_type(req.facility_type_id)
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(facility_type))
}

/// Delete facility type request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFacilityTypeRequest {
    pub facility_type_id: i32,
}

/// Hard-delete a facility type.
async fn delete_facility_type(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteFacilityTypeRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .taxonomy_service
        .delete_facility_type(req.facility_type_id)
        .await?;
    state.broadcaster.broadcast(ChangeEvent::TaxonomyChanged);

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list_facility_types))
        .route("/show", post(show_facility_type))
        .route("/create", post(create_facility_type))
        .route("/update", post(update_facility_type))
        .route("/disable", post(disable_facility_type))
        .route("/delete", post(delete_facility_type))
}
