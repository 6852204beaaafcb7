//! Guestbook entry entity.
//!
//! Public reads must never expose `ip_address` or `user_agent`; the
//! service's public projection strips them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guestbook_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Signer name, capped at 32 chars server side
    pub name: String,

    /// Message, capped at 180 chars server side
    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Optional location, capped at 32 chars server side
    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Tracking only, never exposed publicly
    #[sea_orm(nullable)]
    pub ip_address: Option<String>,

    /// Tracking only, never exposed publicly
    #[sea_orm(nullable)]
    pub user_agent: Option<String>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
