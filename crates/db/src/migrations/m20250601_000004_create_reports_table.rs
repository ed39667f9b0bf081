//! Create reports table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Reports::Description).text())
                    .col(
                        ColumnDef::new(Reports::ImageUrls)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Reports::Latitude).double())
                    .col(ColumnDef::new(Reports::Longitude).double())
                    .col(ColumnDef::new(Reports::LocationName).string_len(256))
                    .col(ColumnDef::new(Reports::CategoryId).integer())
                    .col(ColumnDef::new(Reports::Priority).string_len(16))
                    .col(ColumnDef::new(Reports::Status).string_len(16).default("baru"))
                    .col(ColumnDef::new(Reports::AdminNotes).text())
                    .col(ColumnDef::new(Reports::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Reports::UserId).string_len(36).not_null())
                    .col(ColumnDef::new(Reports::ReportedBy).string_len(36))
                    // Nullable: legacy-imported rows may lack it.
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Reports::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_category_id")
                            .from(Reports::Table, Reports::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_status")
                    .table(Reports::Table)
                    .col(Reports::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_category_id")
                    .table(Reports::Table)
                    .col(Reports::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_created_at")
                    .table(Reports::Table)
                    .col(Reports::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    Title,
    Description,
    ImageUrls,
    Latitude,
    Longitude,
    LocationName,
    CategoryId,
    Priority,
    Status,
    AdminNotes,
    ResolvedAt,
    UserId,
    ReportedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}
