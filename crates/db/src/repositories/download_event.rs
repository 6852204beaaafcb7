//! Download event repository.

use std::sync::Arc;

use crate::entities::{DownloadEvent, download_event};
use portfolio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Download event repository for database operations.
#[derive(Clone)]
pub struct DownloadEventRepository {
    db: Arc<DatabaseConnection>,
}

impl DownloadEventRepository {
    /// Create a new download event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a download event.
    pub async fn create(
        &self,
        model: download_event::ActiveModel,
    ) -> AppResult<download_event::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count downloads for a resource.
    pub async fn count_by_resource(&self, resource_id: &str) -> AppResult<u64> {
        DownloadEvent::find()
            .filter(download_event::Column::ResourceId.eq(resource_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_count_by_resource() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                .into_connection(),
        );

        let repo = DownloadEventRepository::new(db);
        let count = repo.count_by_resource("r1").await.unwrap();

        assert_eq!(count, 7);
    }
}
