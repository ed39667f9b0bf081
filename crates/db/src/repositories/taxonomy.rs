//! Taxonomy repositories for categories and facility types.
//!
//! The two taxonomies are structurally identical but live in separate
//! tables, so each gets its own repository with the same method shape.

use std::sync::Arc;

use crate::entities::{Category, FacilityType, category, facility_type};
use fasum_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a category by ID.
    pub async fn get(&self, id: i32) -> AppResult<category::Model> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
    }

    /// List categories by name, optionally restricted to active ones.
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<category::Model>> {
        let mut find = Category::find().order_by_asc(category::Column::Name);

        if active_only {
            find = find.filter(category::Column::IsActive.eq(true));
        }

        find.all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a category.
    pub async fn update(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a category.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Category::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Facility type repository for database operations.
#[derive(Clone)]
pub struct FacilityTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl FacilityTypeRepository {
    /// Create a new facility type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new facility type.
    pub async fn create(
        &self,
        model: facility_type::ActiveModel,
    ) -> AppResult<facility_type::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a facility type by ID.
    pub async fn get(&self, id: i32) -> AppResult<facility_type::Model> {
        FacilityType::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Facility type {id} not found")))
    }

    /// List facility types by name, optionally restricted to active ones.
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<facility_type::Model>> {
        let mut find = FacilityType::find().order_by_asc(facility_type::Column::Name);

        if active_only {
            find = find.filter(facility_type::Column::IsActive.eq(true));
        }

        find.all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a facility type.
    pub async fn update(
        &self,
        model: facility_type::ActiveModel,
    ) -> AppResult<facility_type::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a facility type.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        FacilityType::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
