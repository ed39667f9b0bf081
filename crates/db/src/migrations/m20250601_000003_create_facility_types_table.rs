//! Create facility types table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FacilityTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FacilityTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FacilityTypes::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FacilityTypes::Icon).string_len(64))
                    .col(ColumnDef::new(FacilityTypes::Color).string_len(16))
                    .col(
                        ColumnDef::new(FacilityTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FacilityTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FacilityTypes::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FacilityTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FacilityTypes {
    Table,
    Id,
    Name,
    Icon,
    Color,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
