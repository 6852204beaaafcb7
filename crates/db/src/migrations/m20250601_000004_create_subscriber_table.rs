//! Create subscriber table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriber::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriber::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriber::Email).string_len(320).not_null())
                    .col(
                        ColumnDef::new(Subscriber::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Subscriber::SubscribedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subscriber::LastEmailSent)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscriber::UnsubscribeToken)
                            .string_len(64)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email - re-subscription reactivates instead of duplicating
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriber_email")
                    .table(Subscriber::Table)
                    .col(Subscriber::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: unsubscribe_token (one-click unsubscribe lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriber_unsubscribe_token")
                    .table(Subscriber::Table)
                    .col(Subscriber::UnsubscribeToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: subscribed_at (admin listing, recent stats)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriber_subscribed_at")
                    .table(Subscriber::Table)
                    .col(Subscriber::SubscribedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriber::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscriber {
    Table,
    Id,
    Email,
    IsActive,
    SubscribedAt,
    LastEmailSent,
    UnsubscribeToken,
}
