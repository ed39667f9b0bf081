//! Comment service.

use chrono::Utc;
use fasum_common::{AppError, AppResult};
use fasum_db::{
    entities::comment,
    repositories::{CommentRepository, ReportRepository},
};
use sea_orm::{ActiveValue::NotSet, Set};

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    report_repo: ReportRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, report_repo: ReportRepository) -> Self {
        Self {
            comment_repo,
            report_repo,
        }
    }

    /// Add a comment to a report.
    pub async fn create(
        &self,
        user_id: &str,
        report_id: i32,
        body: &str,
    ) -> AppResult<comment::Model> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Comment body is required".to_string()));
        }
        if body.len() > 2000 {
            return Err(AppError::Validation("Comment too long".to_string()));
        }

        // 404 when the report is gone.
        self.report_repo.get(report_id).await?;

        let model = comment::ActiveModel {
            id: NotSet,
            report_id: Set(report_id),
            user_id: Set(user_id.to_string()),
            body: Set(body.to_string()),
            created_at: Set(Utc::now().into()),
        };

        self.comment_repo.create(model).await
    }

    /// List comments on a report, oldest first.
    pub async fn list_for_report(&self, report_id: i32) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.list_for_report(report_id).await
    }
}
