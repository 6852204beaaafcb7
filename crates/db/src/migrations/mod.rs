//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_resource_table;
mod m20250601_000002_create_engagement_tables;
mod m20250601_000003_create_guestbook_table;
mod m20250601_000004_create_subscriber_table;
mod m20250601_000005_create_weekly_email_table;
mod m20250601_000006_create_admin_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_resource_table::Migration),
            Box::new(m20250601_000002_create_engagement_tables::Migration),
            Box::new(m20250601_000003_create_guestbook_table::Migration),
            Box::new(m20250601_000004_create_subscriber_table::Migration),
            Box::new(m20250601_000005_create_weekly_email_table::Migration),
            Box::new(m20250601_000006_create_admin_tables::Migration),
        ]
    }
}
