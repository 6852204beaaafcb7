//! Create resource table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resource::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resource::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Resource::Type).string_len(16).not_null())
                    .col(ColumnDef::new(Resource::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Resource::Description).text().not_null())
                    .col(
                        ColumnDef::new(Resource::DownloadUrl)
                            .string_len(2048)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Resource::Author).string_len(128).not_null())
                    .col(ColumnDef::new(Resource::Size).string_len(64).null())
                    .col(
                        ColumnDef::new(Resource::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resource::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Resource::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Resource::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (public listing filters on approved; admin queue on pending)
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_status")
                    .table(Resource::Table)
                    .col(Resource::Status)
                    .to_owned(),
            )
            .await?;

        // Index: category (listing filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_category")
                    .table(Resource::Table)
                    .col(Resource::Category)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first pagination)
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_created_at")
                    .table(Resource::Table)
                    .col(Resource::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resource::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Resource {
    Table,
    Id,
    Name,
    Type,
    Category,
    Description,
    DownloadUrl,
    Author,
    Size,
    Date,
    Status,
    CreatedAt,
    UpdatedAt,
}
