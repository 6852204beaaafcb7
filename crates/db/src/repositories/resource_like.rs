//! Resource like repository.

use std::sync::Arc;

use crate::entities::{ResourceLike, resource_like};
use chrono::{DateTime, Utc};
use portfolio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    SqlErr,
};

/// Outcome of a like insert attempt.
#[derive(Debug)]
pub enum LikeInsert {
    /// The like row was created.
    Created(resource_like::Model),
    /// The (resource, identity) pair already has a like row.
    ///
    /// Raised by the unique index when two requests race past the
    /// existence check.
    Duplicate,
}

/// Resource like repository for database operations.
#[derive(Clone)]
pub struct ResourceLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ResourceLikeRepository {
    /// Create a new resource like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by resource and submitter identity.
    pub async fn find_by_resource_and_ip(
        &self,
        resource_id: &str,
        ip_address: &str,
    ) -> AppResult<Option<resource_like::Model>> {
        ResourceLike::find()
            .filter(resource_like::Column::ResourceId.eq(resource_id))
            .filter(resource_like::Column::IpAddress.eq(ip_address))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if an identity has liked a resource.
    pub async fn has_liked(&self, resource_id: &str, ip_address: &str) -> AppResult<bool> {
        Ok(self
            .find_by_resource_and_ip(resource_id, ip_address)
            .await?
            .is_some())
    }

    /// Insert a like, treating a unique-constraint violation as `Duplicate`.
    pub async fn create(&self, model: resource_like::ActiveModel) -> AppResult<LikeInsert> {
        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(LikeInsert::Created(created)),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(LikeInsert::Duplicate),
                _ => Err(AppError::Database(e.to_string())),
            },
        }
    }

    /// Count likes on a resource.
    pub async fn count_by_resource(&self, resource_id: &str) -> AppResult<u64> {
        ResourceLike::find()
            .filter(resource_like::Column::ResourceId.eq(resource_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch all likes created at or after the cutoff (digest window).
    pub async fn find_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<resource_like::Model>> {
        ResourceLike::find()
            .filter(resource_like::Column::CreatedAt.gte(cutoff))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_like(id: &str, resource_id: &str, ip: &str) -> resource_like::Model {
        resource_like::Model {
            id: id.to_string(),
            resource_id: resource_id.to_string(),
            ip_address: ip.to_string(),
            user_agent: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let like = create_test_like("l1", "r1", "1.2.3.4");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = ResourceLikeRepository::new(db);
        assert!(repo.has_liked("r1", "1.2.3.4").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<resource_like::Model>::new()])
                .into_connection(),
        );

        let repo = ResourceLikeRepository::new(db);
        assert!(!repo.has_liked("r1", "5.6.7.8").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_resource() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = ResourceLikeRepository::new(db);
        assert_eq!(repo.count_by_resource("r1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_find_since() {
        let l1 = create_test_like("l1", "r1", "1.2.3.4");
        let l2 = create_test_like("l2", "r2", "1.2.3.4");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = ResourceLikeRepository::new(db);
        let result = repo.find_since(Utc::now()).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
