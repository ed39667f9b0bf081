//! Category entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report category model.
///
/// Soft-disabled categories (`is_active = false`) stay referenced by
/// historical reports but are excluded from active listings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    /// Icon identifier, resolved to a renderer by the client.
    #[sea_orm(nullable)]
    pub icon: Option<String>,

    /// Display color (hex).
    #[sea_orm(nullable)]
    pub color: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

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
