//! Session-based authentication service.
//!
//! Mints bearer tokens on login, resolves them back to users on each
//! request, and reaps expired sessions lazily on lookup.

use chrono::{Duration, Utc};
use fasum_common::{AppError, AppResult};
use fasum_db::{
    entities::{session, user},
    repositories::SessionRepository,
};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::Set;

use super::user::UserService;

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    session_repo: SessionRepository,
    user_service: UserService,
    session_ttl: Duration,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(
        session_repo: SessionRepository,
        user_service: UserService,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            session_repo,
            user_service,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Verify credentials and mint a new session.
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> AppResult<(session::Model, user::Model)> {
        let user = self
            .user_service
            .verify_credentials(username_or_email, password)
            .await?;

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();

        let now = Utc::now();
        let model = session::ActiveModel {
            token: Set(token),
            user_id: Set(user.id.clone()),
            created_at: Set(now.into()),
            expires_at: Set((now + self.session_ttl).into()),
        };

        let session = self.session_repo.create(model).await?;

        tracing::info!(user_id = %user.id, "Session created");

        Ok((session, user))
    }

    /// Resolve a bearer token to its user. Expired sessions are deleted on
    /// sight and rejected.
    pub async fn current_session(&self, token: &str) -> AppResult<user::Model> {
        let Some(session) = self.session_repo.get(token).await? else {
            return Err(AppError::Unauthorized);
        };

        if session.expires_at < Utc::now().fixed_offset() {
            self.session_repo.delete(token).await?;
            return Err(AppError::Unauthorized);
        }

        self.user_service.get(&session.user_id).await
    }

    /// Terminate a session.
    pub async fn sign_out(&self, token: &str) -> AppResult<()> {
        self.session_repo.delete(token).await
    }
}
