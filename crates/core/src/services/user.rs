//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use fasum_common::{AppError, AppResult};
use fasum_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};
use sea_orm::{IntoActiveModel, Set};

/// Input for creating a user.
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

/// Input for updating a user. `None` leaves a field untouched.
#[derive(Default)]
pub struct UpdateUserInput {
    pub full_name: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Create a new user account.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        let username = input.username.trim();
        if username.is_empty() || username.len() > 128 {
            return Err(AppError::Validation("Invalid username".to_string()));
        }
        if !input.email.contains('@') {
            return Err(AppError::Validation("Invalid email".to_string()));
        }
        if input.password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.user_repo.get_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.user_repo.get_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(username.to_string()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            full_name: Set(input.full_name),
            avatar_url: Set(None),
            role: Set(input.role),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users with optional role filter.
    pub async fn list(
        &self,
        role: Option<UserRole>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(role, limit, offset).await
    }

    /// Update a user's profile, role, or password.
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        let existing = self.user_repo.get_by_id(id).await?;
        let mut model = existing.into_active_model();

        if let Some(full_name) = input.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(avatar_url) = input.avatar_url {
            model.avatar_url = Set(avatar_url);
        }
        if let Some(role) = input.role {
            model.role = Set(role);
        }
        if let Some(password) = input.password {
            if password.len() < 8 {
                return Err(AppError::Validation(
                    "Password must be at least 8 characters".to_string(),
                ));
            }
            model.password_hash = Set(hash_password(&password)?);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }

    /// Hard-delete a user.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(id).await?;
        self.user_repo.delete(id).await?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Look up a user by username or email and check the password.
    pub async fn verify_credentials(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> AppResult<user::Model> {
        let user = if username_or_email.contains('@') {
            self.user_repo.get_by_email(username_or_email).await?
        } else {
            self.user_repo.get_by_username(username_or_email).await?
        };

        let Some(user) = user else {
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
