//! Newsletter subscriber entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriber")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Lowercased, trimmed before insert
    #[sea_orm(unique)]
    pub email: String,

    pub is_active: bool,

    #[sea_orm(indexed)]
    pub subscribed_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub last_email_sent: Option<DateTimeWithTimeZone>,

    /// Opaque token for one-click unsubscribe links
    #[sea_orm(unique)]
    pub unsubscribe_token: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
