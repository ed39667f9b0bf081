//! Facility type entity.
//!
//! Classification taxonomy for the facility concept. Same lifecycle as
//! [`super::category`]: soft-disable via `is_active`, hard delete by admin.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Facility type model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facility_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(nullable)]
    pub icon: Option<String>,

    #[sea_orm(nullable)]
    pub color: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
