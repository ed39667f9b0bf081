//! Report service: CRUD and the status workflow.

use chrono::Utc;
use fasum_common::{AppError, AppResult};
use fasum_db::{
    entities::{
        category,
        report::{self, Priority, ReportStatus},
    },
    repositories::{NotificationRepository, ReportQuery, ReportRepository},
};
use sea_orm::{ActiveValue::NotSet, IntoActiveModel, Set};

/// Input for creating a report.
pub struct CreateReportInput {
    pub title: String,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub category_id: Option<i32>,
    pub priority: Option<Priority>,
    /// Proxy submitter, when staff files on behalf of a citizen.
    pub reported_by: Option<String>,
}

/// Input for updating report content fields. `None` leaves a field untouched.
#[derive(Default)]
pub struct UpdateReportInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image_urls: Option<Vec<String>>,
    pub location_name: Option<Option<String>>,
    pub category_id: Option<Option<i32>>,
    pub priority: Option<Priority>,
    pub admin_notes: Option<Option<String>>,
}

/// Report service.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    notification_repo: NotificationRepository,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            report_repo,
            notification_repo,
        }
    }

    /// Create a new report. Initial status is Baru.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Report title is required".to_string()));
        }
        if title.len() > 256 {
            return Err(AppError::Validation("Report title too long".to_string()));
        }
        // Geolocation comes as a pair, by convention.
        if input.latitude.is_some() != input.longitude.is_some() {
            return Err(AppError::Validation(
                "Latitude and longitude must both be present or both be absent".to_string(),
            ));
        }

        let model = report::ActiveModel {
            id: NotSet,
            title: Set(title.to_string()),
            description: Set(input.description),
            image_urls: Set(serde_json::json!(input.image_urls)),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            location_name: Set(input.location_name),
            category_id: Set(input.category_id),
            priority: Set(input.priority),
            status: Set(Some(ReportStatus::New)),
            admin_notes: Set(None),
            resolved_at: Set(None),
            user_id: Set(user_id.to_string()),
            reported_by: Set(input.reported_by),
            created_at: Set(Some(Utc::now().into())),
            updated_at: Set(None),
        };

        let report = self.report_repo.create(model).await?;

        tracing::info!(report_id = report.id, user_id = user_id, "Report created");

        Ok(report)
    }

    /// Get a report by ID.
    pub async fn get(&self, id: i32) -> AppResult<report::Model> {
        self.report_repo.get(id).await
    }

    /// Get a report with its category joined.
    pub async fn get_with_category(
        &self,
        id: i32,
    ) -> AppResult<(report::Model, Option<category::Model>)> {
        self.report_repo.get_with_category(id).await
    }

    /// List reports matching a query spec, with categories joined.
    pub async fn list(
        &self,
        query: &ReportQuery,
    ) -> AppResult<Vec<(report::Model, Option<category::Model>)>> {
        self.report_repo.list(query).await
    }

    /// Update content fields of a report.
    pub async fn update(&self, id: i32, input: UpdateReportInput) -> AppResult<report::Model> {
        let existing = self.report_repo.get(id).await?;
        let mut model = existing.into_active_model();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::Validation("Report title is required".to_string()));
            }
            model.title = Set(title);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(image_urls) = input.image_urls {
            model.image_urls = Set(serde_json::json!(image_urls));
        }
        if let Some(location_name) = input.location_name {
            model.location_name = Set(location_name);
        }
        if let Some(category_id) = input.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(priority) = input.priority {
            model.priority = Set(Some(priority));
        }
        if let Some(admin_notes) = input.admin_notes {
            model.admin_notes = Set(admin_notes);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.report_repo.update(model).await
    }

    /// Move a report to a new status.
    ///
    /// Any status may move to any other status by direct admin action.
    /// Entering Done stamps `resolved_at`; leaving Done keeps the stamp, and
    /// re-entering Done does not overwrite it. The submitting user gets a
    /// notification about the change.
    pub async fn update_status(
        &self,
        id: i32,
        new_status: ReportStatus,
    ) -> AppResult<report::Model> {
        let existing = self.report_repo.get(id).await?;
        let resolved_at = resolved_at_after_transition(
            &existing.effective_status(),
            &new_status,
            existing.resolved_at,
            Utc::now().into(),
        );
        let submitter = existing.user_id.clone();

        let mut model = existing.into_active_model();
        model.status = Set(Some(new_status.clone()));
        model.resolved_at = Set(resolved_at);
        model.updated_at = Set(Some(Utc::now().into()));

        let report = self.report_repo.update(model).await?;

        tracing::info!(
            report_id = report.id,
            status = ?new_status,
            "Report status updated"
        );

        let body = match new_status {
            ReportStatus::Done => "Laporan Anda telah selesai ditangani",
            ReportStatus::InProgress => "Laporan Anda sedang diproses",
            ReportStatus::Waiting => "Laporan Anda menunggu penanganan",
            ReportStatus::New => "Laporan Anda telah diterima",
        };
        self.notification_repo
            .create(NotificationRepository::new_model(
                &submitter,
                Some(report.id),
                "Status laporan diperbarui",
                body,
            ))
            .await?;

        Ok(report)
    }

    /// Delete a report.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        // 404 when absent, same as get.
        self.report_repo.get(id).await?;
        self.report_repo.delete(id).await?;

        tracing::info!(report_id = id, "Report deleted");
        Ok(())
    }

    /// Fetch report rows for the analytics pipeline.
    pub async fn list_since(
        &self,
        horizon: Option<chrono::DateTime<chrono::FixedOffset>>,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.list_since(horizon).await
    }
}

/// The `resolved_at` value after a status transition.
///
/// Entering Done from any other state stamps the transition instant.
/// Regressing out of Done keeps the existing stamp, as does re-entering Done.
fn resolved_at_after_transition(
    current: &ReportStatus,
    next: &ReportStatus,
    existing: Option<chrono::DateTime<chrono::FixedOffset>>,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    if *next == ReportStatus::Done && *current != ReportStatus::Done && existing.is_none() {
        Some(now)
    } else {
        existing
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn make_report(id: i32, status: Option<ReportStatus>) -> report::Model {
        report::Model {
            id,
            title: format!("Report {id}"),
            description: None,
            image_urls: serde_json::json!([]),
            latitude: None,
            longitude: None,
            location_name: None,
            category_id: None,
            priority: None,
            status,
            admin_notes: None,
            resolved_at: None,
            user_id: "u1".to_string(),
            reported_by: None,
            created_at: Some(ts("2024-01-01T00:00:00+00:00")),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> ReportService {
        let db = Arc::new(db);
        ReportService::new(
            ReportRepository::new(db.clone()),
            NotificationRepository::new(db),
        )
    }

    #[test]
    fn test_entering_done_stamps_resolved_at() {
        let now = ts("2024-01-10T00:00:00+00:00");
        let resolved = resolved_at_after_transition(
            &ReportStatus::InProgress,
            &ReportStatus::Done,
            None,
            now,
        );
        assert_eq!(resolved, Some(now));
    }

    #[test]
    fn test_leaving_done_keeps_resolved_at() {
        let stamped = ts("2024-01-05T00:00:00+00:00");
        let now = ts("2024-01-10T00:00:00+00:00");
        let resolved = resolved_at_after_transition(
            &ReportStatus::Done,
            &ReportStatus::InProgress,
            Some(stamped),
            now,
        );
        assert_eq!(resolved, Some(stamped));
    }

    #[test]
    fn test_reentering_done_keeps_original_stamp() {
        let stamped = ts("2024-01-05T00:00:00+00:00");
        let now = ts("2024-01-10T00:00:00+00:00");
        let resolved = resolved_at_after_transition(
            &ReportStatus::New,
            &ReportStatus::Done,
            Some(stamped),
            now,
        );
        assert_eq!(resolved, Some(stamped));
    }

    #[test]
    fn test_non_done_transition_leaves_resolved_at_unset() {
        let now = ts("2024-01-10T00:00:00+00:00");
        let resolved = resolved_at_after_transition(
            &ReportStatus::New,
            &ReportStatus::Waiting,
            None,
            now,
        );
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let result = service
            .create(
                "u1",
                CreateReportInput {
                    title: "   ".to_string(),
                    description: None,
                    image_urls: vec![],
                    latitude: None,
                    longitude: None,
                    location_name: None,
                    category_id: None,
                    priority: None,
                    reported_by: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_half_a_coordinate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let result = service
            .create(
                "u1",
                CreateReportInput {
                    title: "Jalan rusak".to_string(),
                    description: None,
                    image_urls: vec![],
                    latitude: Some(-6.2),
                    longitude: None,
                    location_name: None,
                    category_id: None,
                    priority: None,
                    reported_by: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_since_returns_rows() {
        let r1 = make_report(1, Some(ReportStatus::New));
        let r2 = make_report(2, Some(ReportStatus::Done));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[r1, r2]])
            .into_connection();
        let service = service(db);

        let rows = service.list_since(None).await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
