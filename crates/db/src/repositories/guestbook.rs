//! Guestbook repository.

use std::sync::Arc;

use crate::entities::{GuestbookEntry, guestbook_entry};
use portfolio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};

/// Guestbook repository for database operations.
#[derive(Clone)]
pub struct GuestbookRepository {
    db: Arc<DatabaseConnection>,
}

impl GuestbookRepository {
    /// Create a new guestbook repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an entry.
    pub async fn create(
        &self,
        model: guestbook_entry::ActiveModel,
    ) -> AppResult<guestbook_entry::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List entries by creation time (paginated).
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
        ascending: bool,
    ) -> AppResult<Vec<guestbook_entry::Model>> {
        let query = GuestbookEntry::find();

        let query = if ascending {
            query.order_by_asc(guestbook_entry::Column::CreatedAt)
        } else {
            query.order_by_desc(guestbook_entry::Column::CreatedAt)
        };

        query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all entries.
    pub async fn count(&self) -> AppResult<u64> {
        GuestbookEntry::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The `limit` earliest entries, ascending (trophy ranking).
    pub async fn oldest(&self, limit: u64) -> AppResult<Vec<guestbook_entry::Model>> {
        GuestbookEntry::find()
            .order_by_asc(guestbook_entry::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
