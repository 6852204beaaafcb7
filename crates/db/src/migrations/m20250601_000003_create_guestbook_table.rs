//! Create guestbook entry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuestbookEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuestbookEntry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuestbookEntry::Name).string_len(32).not_null())
                    .col(ColumnDef::new(GuestbookEntry::Message).text().not_null())
                    .col(
                        ColumnDef::new(GuestbookEntry::Location)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GuestbookEntry::IpAddress)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GuestbookEntry::UserAgent)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GuestbookEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GuestbookEntry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: created_at (pagination and trophy ranking)
        manager
            .create_index(
                Index::create()
                    .name("idx_guestbook_entry_created_at")
                    .table(GuestbookEntry::Table)
                    .col(GuestbookEntry::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuestbookEntry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuestbookEntry {
    Table,
    Id,
    Name,
    Message,
    Location,
    IpAddress,
    UserAgent,
    CreatedAt,
    UpdatedAt,
}
