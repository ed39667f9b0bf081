//! Session repository.

use std::sync::Arc;

use crate::entities::{Session, session};
use fasum_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Session repository for database operations.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a new session.
    pub async fn create(&self, model: session::ActiveModel) -> AppResult<session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a session by token.
    pub async fn get(&self, token: &str) -> AppResult<Option<session::Model>> {
        Session::find_by_id(token)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session by token.
    pub async fn delete(&self, token: &str) -> AppResult<()> {
        Session::delete_by_id(token)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Reap sessions past their expiry.
    pub async fn delete_expired(
        &self,
        now: chrono::DateTime<chrono::FixedOffset>,
    ) -> AppResult<u64> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lt(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
