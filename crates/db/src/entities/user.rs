//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dashboard role of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including user management and hard deletes.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Dashboard access without user management.
    #[sea_orm(string_value = "moderator")]
    Moderator,
    /// Citizen account, no dashboard access.
    #[sea_orm(string_value = "user")]
    #[default]
    User,
}

impl UserRole {
    /// Whether this role may access the dashboard at all.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Moderator)
    }
}

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name.
    #[sea_orm(nullable)]
    pub full_name: Option<String>,

    /// Avatar URL.
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Dashboard role.
    pub role: UserRole,

    /// When the account was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the account was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report::Entity")]
    Report,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
