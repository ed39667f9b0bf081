//! Taxonomy service for categories and facility types.

use chrono::Utc;
use fasum_common::{AppError, AppResult};
use fasum_db::{
    entities::{category, facility_type},
    repositories::{CategoryRepository, FacilityTypeRepository},
};
use sea_orm::{ActiveValue::NotSet, IntoActiveModel, Set};

/// Input for creating a taxonomy entry.
pub struct CreateTaxonomyInput {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Input for updating a taxonomy entry. `None` leaves a field untouched.
#[derive(Default)]
pub struct UpdateTaxonomyInput {
    pub name: Option<String>,
    pub icon: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub is_active: Option<bool>,
}

fn validated_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if name.len() > 128 {
        return Err(AppError::Validation("Name too long".to_string()));
    }
    Ok(name.to_string())
}

/// Taxonomy service.
#[derive(Clone)]
pub struct TaxonomyService {
    category_repo: CategoryRepository,
    facility_type_repo: FacilityTypeRepository,
}

impl TaxonomyService {
    /// Create a new taxonomy service.
    #[must_use]
    pub const fn new(
        category_repo: CategoryRepository,
        facility_type_repo: FacilityTypeRepository,
    ) -> Self {
        Self {
            category_repo,
            facility_type_repo,
        }
    }

    // ========== Categories ==========

    /// Create a category.
    pub async fn create_category(&self, input: CreateTaxonomyInput) -> AppResult<category::Model> {
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(validated_name(&input.name)?),
            icon: Set(input.icon),
            color: Set(input.color),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.category_repo.create(model).await
    }

    /// List categories. `active_only` excludes soft-disabled entries, as in
    /// new-report pickers; the full list is for admin screens.
    pub async fn list_categories(&self, active_only: bool) -> AppResult<Vec<category::Model>> {
        self.category_repo.list(active_only).await
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: i32) -> AppResult<category::Model> {
        self.category_repo.get(id).await
    }

    /// Update a category.
    pub async fn update_category(
        &self,
        id: i32,
        input: UpdateTaxonomyInput,
    ) -> AppResult<category::Model> {
        let existing = self.category_repo.get(id).await?;
        let mut model = existing.into_active_model();

        if let Some(name) = input.name {
            model.name = Set(validated_name(&name)?);
        }
        if let Some(icon) = input.icon {
            model.icon = Set(icon);
        }
        if let Some(color) = input.color {
            model.color = Set(color);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.category_repo.update(model).await
    }

    /// Soft-disable a category. Historical reports keep referencing it.
    pub async fn disable_category(&self, id: i32) -> AppResult<category::Model> {
        self.update_category(
            id,
            UpdateTaxonomyInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    /// Hard-delete a category.
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.category_repo.get(id).await?;
        self.category_repo.delete(id).await
    }

    // ========== Facility types ==========

    /// Create a facility type.
    pub async fn create_facility_type(
        &self,
        input: CreateTaxonomyInput,
    ) -> AppResult<facility_type::Model> {
        let model = facility_type::ActiveModel {
            id: NotSet,
            name: Set(validated_name(&input.name)?),
            icon: Set(input.icon),
            color: Set(input.color),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.facility_type_repo.create(model).await
    }

    /// List facility types.
    pub async fn list_facility_types(
        &self,
        active_only: bool,
    ) -> AppResult<Vec<facility_type::Model>> {
        self.facility_type_repo.list(active_only).await
    }

    /// Get a facility type by ID.
    pub async fn get_facility_type(&self, id: i32) -> AppResult<facility_type::Model> {
        self.facility_type_repo.get(id).await
    }

    /// Update a facility type.
    pub async fn update_facility_type(
        &self,
        id: i32,
        input: UpdateTaxonomyInput,
    ) -> AppResult<facility_type::Model> {
        let existing = self.facility_type_repo.get(id).await?;
        let mut model = existing.into_active_model();

        if let Some(name) = input.name {
            model.name = Set(validated_name(&name)?);
        }
        if let Some(icon) = input.icon {
            model.icon = Set(icon);
        }
        if let Some(color) = input.color {
            model.color = Set(color);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.facility_type_repo.update(model).await
    }

    /// Soft-disable a facility type.
    pub async fn disable_facility_type(&self, id: i32) -> AppResult<facility_type::Model> {
        self.update_facility_type(
            id,
            UpdateTaxonomyInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    /// Hard-delete a facility type.
    pub async fn delete_facility_type(&self, id: i32) -> AppResult<()> {
        self.facility_type_repo.get(id).await?;
        self.facility_type_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn make_category(id: i32, name: &str, is_active: bool) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            icon: None,
            color: None,
            is_active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> TaxonomyService {
        let db = Arc::new(db);
        TaxonomyService::new(
            CategoryRepository::new(db.clone()),
            FacilityTypeRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_list_categories() {
        let c1 = make_category(1, "Jalan", true);
        let c2 = make_category(2, "Taman", true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[c1, c2]])
            .into_connection();

        let result = service(db).list_categories(true).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Jalan");
    }

    #[tokio::test]
    async fn test_create_category_rejects_blank_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create_category(CreateTaxonomyInput {
                name: "  ".to_string(),
                icon: None,
                color: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
