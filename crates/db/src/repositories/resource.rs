//! Resource repository.

use std::sync::Arc;

use crate::entities::{
    Resource,
    resource::{self, ResourceCategory, ResourceStatus},
};
use portfolio_common::{AppError, AppResult};
use sea_orm::sea_query::{Condition, Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

/// Resource repository for database operations.
#[derive(Clone)]
pub struct ResourceRepository {
    db: Arc<DatabaseConnection>,
}

impl ResourceRepository {
    /// Create a new resource repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a resource by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<resource::Model>> {
        Resource::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new resource.
    pub async fn create(&self, model: resource::ActiveModel) -> AppResult<resource::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Build the filtered listing query shared by `list` and `count`.
    fn filtered(
        status: Option<ResourceStatus>,
        category: Option<ResourceCategory>,
        search: Option<&str>,
    ) -> Select<Resource> {
        let mut query = Resource::find();

        if let Some(status) = status {
            query = query.filter(resource::Column::Status.eq(status));
        }

        if let Some(category) = category {
            query = query.filter(resource::Column::Category.eq(category));
        }

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(resource::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(resource::Column::Description).ilike(pattern)),
            );
        }

        query
    }

    /// List resources matching the filters, newest first.
    pub async fn list(
        &self,
        status: Option<ResourceStatus>,
        category: Option<ResourceCategory>,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<resource::Model>> {
        Self::filtered(status, category, search)
            .order_by_desc(resource::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count resources matching the filters.
    pub async fn count(
        &self,
        status: Option<ResourceStatus>,
        category: Option<ResourceCategory>,
        search: Option<&str>,
    ) -> AppResult<u64> {
        Self::filtered(status, category, search)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch approved resources by ID (digest assembly).
    pub async fn find_approved_by_ids(&self, ids: &[String]) -> AppResult<Vec<resource::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Resource::find()
            .filter(resource::Column::Id.is_in(ids.iter().cloned()))
            .filter(resource::Column::Status.eq(ResourceStatus::Approved))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a resource's moderation status, refreshing `updated_at`.
    pub async fn set_status(
        &self,
        model: resource::Model,
        status: ResourceStatus,
    ) -> AppResult<resource::Model> {
        let mut active: resource::ActiveModel = model.into();
        active.status = Set(status);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::resource::ResourceType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_resource(id: &str, name: &str, status: ResourceStatus) -> resource::Model {
        resource::Model {
            id: id.to_string(),
            name: name.to_string(),
            r#type: ResourceType::Figma,
            category: ResourceCategory::DesignSystems,
            description: "A test resource".to_string(),
            download_url: "https://example.com/kit".to_string(),
            author: "Ada".to_string(),
            size: None,
            date: Utc::now().into(),
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let model = create_test_resource("r1", "Grid Kit", ResourceStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[model.clone()]])
                .into_connection(),
        );

        let repo = ResourceRepository::new(db);
        let result = repo.find_by_id("r1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Grid Kit");
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<resource::Model>::new()])
                .into_connection(),
        );

        let repo = ResourceRepository::new(db);
        let result = repo.find_by_id("nonexistent").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_returns_models() {
        let r1 = create_test_resource("r1", "Grid Kit", ResourceStatus::Approved);
        let r2 = create_test_resource("r2", "Type Scale", ResourceStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ResourceRepository::new(db);
        let result = repo
            .list(Some(ResourceStatus::Approved), None, None, 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = ResourceRepository::new(db);
        let count = repo
            .count(Some(ResourceStatus::Pending), None, Some("grid"))
            .await
            .unwrap();

        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_find_approved_by_ids_empty_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ResourceRepository::new(db);
        let result = repo.find_approved_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }
}
