//! Analytics service.
//!
//! Fetches report rows once and fans them out to the pure aggregation
//! functions in [`crate::stats`]. Aggregation never runs on a failed fetch:
//! a repository error propagates before any computation starts.

use chrono::{DateTime, FixedOffset, Local};
use fasum_common::AppResult;
use fasum_db::repositories::{CategoryRepository, ReportRepository};

use crate::stats::{self, CategoryStat, DayBucket, Overview, ResolutionTime};

/// Trailing window of the daily series, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Analytics service.
#[derive(Clone)]
pub struct AnalyticsService {
    report_repo: ReportRepository,
    category_repo: CategoryRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository, category_repo: CategoryRepository) -> Self {
        Self {
            report_repo,
            category_repo,
        }
    }

    fn now() -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    /// Status/priority overview over all reports.
    pub async fn overview(&self) -> AppResult<Overview> {
        let reports = self.report_repo.list_since(None).await?;
        Ok(stats::overview(&reports, Self::now()))
    }

    /// Per-category rollup over all reports, ordered by category name
    /// (the repository's listing order).
    pub async fn category_breakdown(&self) -> AppResult<Vec<CategoryStat>> {
        let reports = self.report_repo.list_since(None).await?;
        let categories = self.category_repo.list(true).await?;
        Ok(stats::category_breakdown(&reports, &categories))
    }

    /// Daily created/resolved/pending series over a trailing window.
    ///
    /// The full set is fetched and bucketing decides: a row created before
    /// the window may still have been resolved inside it, so no creation
    /// horizon can be applied to the fetch.
    pub async fn daily_series(&self, window_days: u32) -> AppResult<Vec<DayBucket>> {
        let now = Self::now();
        let reports = self.report_repo.list_since(None).await?;
        Ok(stats::daily_series(&reports, window_days, now))
    }

    /// Resolution-time statistics over all reports.
    pub async fn resolution_time(&self) -> AppResult<ResolutionTime> {
        let reports = self.report_repo.list_since(None).await?;
        Ok(stats::resolution_time(&reports))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fasum_db::entities::report::{self, ReportStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

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
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_overview_counts_fetched_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    make_report(1, Some(ReportStatus::Done)),
                    make_report(2, Some(ReportStatus::New)),
                ]])
                .into_connection(),
        );

        let service =
            AnalyticsService::new(ReportRepository::new(db.clone()), CategoryRepository::new(db));

        let overview = service.overview().await.unwrap();
        assert_eq!(overview.total, 2);
        assert_eq!(overview.by_status.done, 1);
        assert_eq!(overview.resolution_rate_percent, 50);
    }

    #[tokio::test]
    async fn test_daily_series_has_full_window_without_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let service =
            AnalyticsService::new(ReportRepository::new(db.clone()), CategoryRepository::new(db));

        let series = service.daily_series(DEFAULT_WINDOW_DAYS).await.unwrap();
        assert_eq!(series.len(), 30);
    }
}
