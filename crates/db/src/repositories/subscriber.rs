//! Subscriber repository.

use std::sync::Arc;

use crate::entities::{Subscriber, subscriber};
use chrono::{DateTime, Utc};
use portfolio_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

/// Subscriber repository for database operations.
#[derive(Clone)]
pub struct SubscriberRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriberRepository {
    /// Create a new subscriber repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subscriber by (normalized) email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<subscriber::Model>> {
        Subscriber::find()
            .filter(subscriber::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a subscriber by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<subscriber::Model>> {
        Subscriber::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a subscriber by unsubscribe token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<subscriber::Model>> {
        Subscriber::find()
            .filter(subscriber::Column::UnsubscribeToken.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new subscriber.
    pub async fn create(&self, model: subscriber::ActiveModel) -> AppResult<subscriber::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reactivate an inactive subscriber, refreshing `subscribed_at`.
    pub async fn reactivate(&self, model: subscriber::Model) -> AppResult<subscriber::Model> {
        let mut active: subscriber::ActiveModel = model.into();
        active.is_active = Set(true);
        active.subscribed_at = Set(Utc::now().into());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Toggle a subscriber's active flag.
    pub async fn set_active(
        &self,
        model: subscriber::Model,
        is_active: bool,
    ) -> AppResult<subscriber::Model> {
        let mut active: subscriber::ActiveModel = model.into();
        active.is_active = Set(is_active);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a subscriber; returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Subscriber::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    fn searched(search: Option<&str>) -> Select<Subscriber> {
        let mut query = Subscriber::find();

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            query = query.filter(Expr::col(subscriber::Column::Email).ilike(pattern));
        }

        query
    }

    /// List subscribers, newest first, with optional email search.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<subscriber::Model>> {
        Self::searched(search)
            .order_by_desc(subscriber::Column::SubscribedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count subscribers matching the optional email search.
    pub async fn count(&self, search: Option<&str>) -> AppResult<u64> {
        Self::searched(search)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active subscribers.
    pub async fn count_active(&self) -> AppResult<u64> {
        Subscriber::find()
            .filter(subscriber::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count subscribers who joined at or after the cutoff.
    pub async fn count_since(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        Subscriber::find()
            .filter(subscriber::Column::SubscribedAt.gte(cutoff))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All active subscribers, newest first (CSV export, digest recipients).
    pub async fn find_active(&self) -> AppResult<Vec<subscriber::Model>> {
        Subscriber::find()
            .filter(subscriber::Column::IsActive.eq(true))
            .order_by_desc(subscriber::Column::SubscribedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stamp `last_email_sent` on every active subscriber.
    pub async fn stamp_last_email_sent(&self, at: DateTime<Utc>) -> AppResult<u64> {
        let result = Subscriber::update_many()
            .col_expr(
                subscriber::Column::LastEmailSent,
                Expr::value(sea_orm::Value::from(at)),
            )
            .filter(subscriber::Column::IsActive.eq(true))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_subscriber(id: &str, email: &str, is_active: bool) -> subscriber::Model {
        subscriber::Model {
            id: id.to_string(),
            email: email.to_string(),
            is_active,
            subscribed_at: Utc::now().into(),
            last_email_sent: None,
            unsubscribe_token: format!("token-{id}"),
        }
    }

    #[tokio::test]
    async fn test_find_by_email_found() {
        let sub = create_test_subscriber("s1", "a@x.com", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sub]])
                .into_connection(),
        );

        let repo = SubscriberRepository::new(db);
        let result = repo.find_by_email("a@x.com").await.unwrap();

        assert!(result.is_some());
        assert!(result.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_find_by_token_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subscriber::Model>::new()])
                .into_connection(),
        );

        let repo = SubscriberRepository::new(db);
        let result = repo.find_by_token("missing").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_removed_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SubscriberRepository::new(db);
        assert!(repo.delete("s1").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_active() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(9))
                }]])
                .into_connection(),
        );

        let repo = SubscriberRepository::new(db);
        assert_eq!(repo.count_active().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_stamp_last_email_sent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 5,
                }])
                .into_connection(),
        );

        let repo = SubscriberRepository::new(db);
        let stamped = repo.stamp_last_email_sent(Utc::now()).await.unwrap();

        assert_eq!(stamped, 5);
    }
}
