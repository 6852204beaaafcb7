//! Create weekly email table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeeklyEmail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeeklyEmail::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WeeklyEmail::SentAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WeeklyEmail::SubscriberCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeeklyEmail::TopResources)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeeklyEmail::EmailSubject)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WeeklyEmail::EmailContent).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Index: sent_at (history listing, newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_weekly_email_sent_at")
                    .table(WeeklyEmail::Table)
                    .col(WeeklyEmail::SentAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeeklyEmail::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WeeklyEmail {
    Table,
    Id,
    SentAt,
    SubscriberCount,
    TopResources,
    EmailSubject,
    EmailContent,
}
