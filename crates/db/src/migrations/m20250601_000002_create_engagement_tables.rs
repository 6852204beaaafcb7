//! Create download event and resource like tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DownloadEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DownloadEvent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DownloadEvent::ResourceId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DownloadEvent::IpAddress).string_len(64).null())
                    .col(
                        ColumnDef::new(DownloadEvent::UserAgent)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DownloadEvent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_download_event_resource")
                            .from(DownloadEvent::Table, DownloadEvent::ResourceId)
                            .to(Resource::Table, Resource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: resource_id (count per resource)
        manager
            .create_index(
                Index::create()
                    .name("idx_download_event_resource_id")
                    .table(DownloadEvent::Table)
                    .col(DownloadEvent::ResourceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ResourceLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResourceLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ResourceLike::ResourceId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResourceLike::IpAddress)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResourceLike::UserAgent)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ResourceLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_like_resource")
                            .from(ResourceLike::Table, ResourceLike::ResourceId)
                            .to(Resource::Table, Resource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (resource_id, ip_address) - at most one like per identity.
        // A violation on insert is the AlreadyLiked signal, closing the
        // check-then-insert race.
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_like_resource_ip")
                    .table(ResourceLike::Table)
                    .col(ResourceLike::ResourceId)
                    .col(ResourceLike::IpAddress)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: created_at (digest window scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_resource_like_created_at")
                    .table(ResourceLike::Table)
                    .col(ResourceLike::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResourceLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DownloadEvent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DownloadEvent {
    Table,
    Id,
    ResourceId,
    IpAddress,
    UserAgent,
    CreatedAt,
}

#[derive(Iden)]
enum ResourceLike {
    Table,
    Id,
    ResourceId,
    IpAddress,
    UserAgent,
    CreatedAt,
}

#[derive(Iden)]
enum Resource {
    Table,
    Id,
}
