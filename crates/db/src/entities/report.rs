//! Report entity.
//!
//! A report is a citizen-submitted facility complaint. Workflow status and
//! priority are stored as nullable columns: rows imported from the legacy
//! system may carry NULLs, which read as the documented defaults
//! ([`ReportStatus::New`] and [`Priority::Normal`]).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow status of a report.
///
/// Stored with the original Indonesian wire values. Any status may move to
/// any other status by direct admin action; entering `Done` is the only
/// transition that sets `resolved_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum ReportStatus {
    /// Baru — newly submitted, untriaged.
    #[sea_orm(string_value = "baru")]
    #[serde(rename = "baru")]
    #[default]
    New,
    /// Menunggu — acknowledged, waiting on scheduling.
    #[sea_orm(string_value = "menunggu")]
    #[serde(rename = "menunggu")]
    Waiting,
    /// Diproses — work in progress.
    #[sea_orm(string_value = "diproses")]
    #[serde(rename = "diproses")]
    InProgress,
    /// Selesai — resolved.
    #[sea_orm(string_value = "selesai")]
    #[serde(rename = "selesai")]
    Done,
}

/// Urgency classification of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum Priority {
    /// Default urgency.
    #[sea_orm(string_value = "normal")]
    #[serde(rename = "normal")]
    #[default]
    Normal,
    /// Rendah — low.
    #[sea_orm(string_value = "rendah")]
    #[serde(rename = "rendah")]
    Low,
    /// Sedang — medium.
    #[sea_orm(string_value = "sedang")]
    #[serde(rename = "sedang")]
    Medium,
    /// Tinggi — high.
    #[sea_orm(string_value = "tinggi")]
    #[serde(rename = "tinggi")]
    High,
    /// Mendesak — urgent.
    #[sea_orm(string_value = "mendesak")]
    #[serde(rename = "mendesak")]
    Urgent,
}

/// Report model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Short summary of the complaint.
    pub title: String,

    /// Free-text details.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Attached image URLs (JSON array of strings).
    #[sea_orm(column_type = "JsonBinary")]
    pub image_urls: Json,

    /// Geolocation latitude. Present iff `longitude` is present, by convention.
    #[sea_orm(nullable)]
    pub latitude: Option<f64>,

    /// Geolocation longitude.
    #[sea_orm(nullable)]
    pub longitude: Option<f64>,

    /// Free-text location name.
    #[sea_orm(nullable)]
    pub location_name: Option<String>,

    /// Classification category. NULL means uncategorized.
    #[sea_orm(nullable)]
    pub category_id: Option<i32>,

    /// Urgency. NULL reads as [`Priority::Normal`].
    #[sea_orm(nullable)]
    pub priority: Option<Priority>,

    /// Workflow status. NULL reads as [`ReportStatus::New`].
    #[sea_orm(nullable)]
    pub status: Option<ReportStatus>,

    /// Staff-only notes.
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,

    /// Set when status transitions to Done. Not cleared on regression.
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,

    /// Submitting user.
    pub user_id: String,

    /// Proxy submitter, when a staff member files on behalf of a citizen.
    #[sea_orm(nullable)]
    pub reported_by: Option<String>,

    /// NULL only on legacy-imported rows.
    #[sea_orm(nullable)]
    pub created_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Status with the NULL-reads-as-New rule applied.
    #[must_use]
    pub fn effective_status(&self) -> ReportStatus {
        self.status.clone().unwrap_or_default()
    }

    /// Priority with the NULL-reads-as-Normal rule applied.
    #[must_use]
    pub fn effective_priority(&self) -> Priority {
        self.priority.clone().unwrap_or_default()
    }

    /// Whether the report is currently resolved.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.effective_status() == ReportStatus::Done
    }
}
