//! Weekly email entity (immutable audit row of one digest computation).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_email")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub sent_at: DateTimeWithTimeZone,

    /// Active subscriber count at generation time
    pub subscriber_count: i64,

    /// Denormalized snapshot of the top resources, not a live reference
    #[sea_orm(column_type = "JsonBinary")]
    pub top_resources: Json,

    pub email_subject: String,

    #[sea_orm(column_type = "Text")]
    pub email_content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
