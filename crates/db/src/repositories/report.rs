//! Report repository.
//!
//! All dashboard data operations are direct pass-through queries; the
//! analytics layer consumes the returned rows as plain records.

use std::sync::Arc;

use crate::entities::{
    Category, Report, category,
    report::{self, Priority, ReportStatus},
};
use fasum_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Filter and pagination parameters for report listings.
///
/// Serializable view state: one value of this struct captures everything a
/// dashboard screen has applied, and is passed explicitly into the fetch
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    /// Filter by workflow status.
    pub status: Option<ReportStatus>,
    /// Filter by priority.
    pub priority: Option<Priority>,
    /// Filter by category.
    pub category_id: Option<i32>,
    /// Substring search over title and description.
    pub search: Option<String>,
    /// Only reports created at or after this instant.
    pub created_gte: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Only reports created at or before this instant.
    pub created_lte: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Page size. `None` fetches the full matching set (exports).
    pub limit: Option<u64>,
    /// Page offset.
    pub offset: u64,
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID.
    pub async fn get(&self, id: i32) -> AppResult<report::Model> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or(AppError::ReportNotFound(id))
    }

    /// Get a report by ID with its category joined.
    pub async fn get_with_category(
        &self,
        id: i32,
    ) -> AppResult<(report::Model, Option<category::Model>)> {
        Report::find_by_id(id)
            .find_also_related(Category)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or(AppError::ReportNotFound(id))
    }

    /// List reports with their categories joined, newest first.
    pub async fn list(
        &self,
        query: &ReportQuery,
    ) -> AppResult<Vec<(report::Model, Option<category::Model>)>> {
        let mut find = Report::find()
            .find_also_related(Category)
            .order_by_desc(report::Column::CreatedAt);

        if let Some(status) = &query.status {
            find = find.filter(report::Column::Status.eq(status.clone()));
        }
        if let Some(priority) = &query.priority {
            find = find.filter(report::Column::Priority.eq(priority.clone()));
        }
        if let Some(category_id) = query.category_id {
            find = find.filter(report::Column::CategoryId.eq(category_id));
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            find = find.filter(
                Condition::any()
                    .add(report::Column::Title.contains(search))
                    .add(report::Column::Description.contains(search)),
            );
        }
        if let Some(gte) = query.created_gte {
            find = find.filter(report::Column::CreatedAt.gte(gte));
        }
        if let Some(lte) = query.created_lte {
            find = find.filter(report::Column::CreatedAt.lte(lte));
        }

        if let Some(limit) = query.limit {
            find = find.limit(limit);
        }

        find.offset(query.offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch every report created at or after `horizon` (all reports when
    /// `None`). This is the record fetcher feeding the analytics core.
    pub async fn list_since(
        &self,
        horizon: Option<chrono::DateTime<chrono::FixedOffset>>,
    ) -> AppResult<Vec<report::Model>> {
        let mut find = Report::find().order_by_asc(report::Column::CreatedAt);

        if let Some(horizon) = horizon {
            find = find.filter(report::Column::CreatedAt.gte(horizon));
        }

        find.all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a report.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Report::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all reports.
    pub async fn count(&self) -> AppResult<u64> {
        Report::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    // Postgres binds LIMIT as a signed 64-bit value, so "no page size" must
    // omit the clause rather than pass a sentinel like u64::MAX.
    #[tokio::test]
    async fn test_list_without_limit_omits_limit_clause() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db.clone());
        let query = ReportQuery {
            limit: None,
            ..Default::default()
        };
        let rows = repo.list(&query).await.unwrap();
        assert!(rows.is_empty());

        drop(repo);
        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert!(!sql.contains("LIMIT"), "unexpected LIMIT clause: {sql}");
    }

    #[tokio::test]
    async fn test_list_with_limit_emits_limit_clause() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db.clone());
        let query = ReportQuery {
            limit: Some(100),
            ..Default::default()
        };
        repo.list(&query).await.unwrap();

        drop(repo);
        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert!(sql.contains("LIMIT"), "missing LIMIT clause: {sql}");
    }
}
