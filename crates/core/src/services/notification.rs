//! Notification service.

use fasum_common::{AppError, AppResult};
use fasum_db::{entities::notification, repositories::NotificationRepository};

/// Notification service.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self { notification_repo }
    }

    /// List a user's notifications, newest first.
    pub async fn list(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .list_for_user(user_id, limit, offset)
            .await
    }

    /// Mark one notification read. Only the owner's rows match.
    pub async fn mark_read(&self, user_id: &str, id: i32) -> AppResult<()> {
        let affected = self.notification_repo.mark_read(id, user_id).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!("Notification {id} not found")));
        }
        Ok(())
    }

    /// Mark all of a user's notifications read.
    pub async fn mark_all_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_read(user_id).await
    }
}
