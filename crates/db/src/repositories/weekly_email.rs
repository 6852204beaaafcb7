//! Weekly digest email repository.

use std::sync::Arc;

use crate::entities::{WeeklyEmail, weekly_email};
use portfolio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};

/// Repository for persisted digest send records.
#[derive(Clone)]
pub struct WeeklyEmailRepository {
    db: Arc<DatabaseConnection>,
}

impl WeeklyEmailRepository {
    /// Create a new weekly email repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a digest send.
    pub async fn create(&self, model: weekly_email::ActiveModel) -> AppResult<weekly_email::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List send records, most recent first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<weekly_email::Model>> {
        WeeklyEmail::find()
            .order_by_desc(weekly_email::Column::SentAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all send records.
    pub async fn count(&self) -> AppResult<u64> {
        WeeklyEmail::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_record(id: &str, subject: &str) -> weekly_email::Model {
        weekly_email::Model {
            id: id.to_string(),
            sent_at: Utc::now().into(),
            subscriber_count: 12,
            top_resources: serde_json::json!([]),
            email_subject: subject.to_string(),
            email_content: "<html></html>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_returns_records() {
        let records = vec![
            create_test_record("w2", "Top 10 Resources - 6/8/2025"),
            create_test_record("w1", "Top 10 Resources - 6/1/2025"),
        ];

        let db = Arc::new(
            sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
                .append_query_results([records])
                .into_connection(),
        );

        let repo = WeeklyEmailRepository::new(db);
        let result = repo.list(20, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "w2");
    }

    #[tokio::test]
    async fn test_count() {
        let db = Arc::new(
            sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = WeeklyEmailRepository::new(db);
        assert_eq!(repo.count().await.unwrap(), 4);
    }
}
