//! Resource moderation pipeline.

use crate::services::auth::AdminPrincipal;
use portfolio_common::{AppError, AppResult};
use portfolio_db::{
    entities::resource::{self, ResourceStatus},
    repositories::ResourceRepository,
};

/// Moderation service for reviewing submitted resources.
#[derive(Clone)]
pub struct ModerationService {
    resource_repo: ResourceRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(resource_repo: ResourceRepository) -> Self {
        Self { resource_repo }
    }

    /// Approve a pending resource, publishing it to the directory.
    pub async fn approve(
        &self,
        admin: &AdminPrincipal,
        resource_id: &str,
    ) -> AppResult<resource::Model> {
        self.transition(admin, resource_id, ResourceStatus::Approved)
            .await
    }

    /// Reject a pending resource.
    pub async fn reject(
        &self,
        admin: &AdminPrincipal,
        resource_id: &str,
    ) -> AppResult<resource::Model> {
        self.transition(admin, resource_id, ResourceStatus::Rejected)
            .await
    }

    /// Move a resource to a terminal status. Pending resources may go
    /// either way; a terminal status may be restated but never flipped.
    async fn transition(
        &self,
        admin: &AdminPrincipal,
        resource_id: &str,
        target: ResourceStatus,
    ) -> AppResult<resource::Model> {
        let resource = self
            .resource_repo
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(resource_id.to_string()))?;

        if resource.status == target {
            return Ok(resource);
        }

        if resource.status != ResourceStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Resource has already been {}",
                match resource.status {
                    ResourceStatus::Approved => "approved",
                    ResourceStatus::Rejected => "rejected",
                    ResourceStatus::Pending => "reviewed",
                }
            )));
        }

        let updated = self.resource_repo.set_status(resource, target).await?;
        tracing::info!(
            resource_id = %updated.id,
            status = ?updated.status,
            moderator = %admin.username,
            "resource moderated"
        );

        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portfolio_db::entities::resource::{ResourceCategory, ResourceType};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn admin() -> AdminPrincipal {
        AdminPrincipal {
            id: "a1".to_string(),
            username: "admin".to_string(),
        }
    }

    fn resource_with_status(id: &str, status: ResourceStatus) -> resource::Model {
        resource::Model {
            id: id.to_string(),
            name: "Type Scale".to_string(),
            r#type: ResourceType::Link,
            category: ResourceCategory::DesignSystems,
            description: "Typography scale generator".to_string(),
            download_url: "https://example.com/scale".to_string(),
            author: "Kim".to_string(),
            size: None,
            date: Utc::now().into(),
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> ModerationService {
        ModerationService::new(ResourceRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_approve_pending_resource() {
        let pending = resource_with_status("r1", ResourceStatus::Pending);
        let approved = resource_with_status("r1", ResourceStatus::Approved);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending], [approved]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = service(db).approve(&admin(), "r1").await.unwrap();

        assert_eq!(result.status, ResourceStatus::Approved);
    }

    #[tokio::test]
    async fn test_reapprove_is_idempotent() {
        let approved = resource_with_status("r1", ResourceStatus::Approved);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[approved]])
            .into_connection();

        let result = service(db).approve(&admin(), "r1").await.unwrap();

        assert_eq!(result.status, ResourceStatus::Approved);
    }

    #[tokio::test]
    async fn test_reject_approved_resource_conflicts() {
        let approved = resource_with_status("r1", ResourceStatus::Approved);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[approved]])
            .into_connection();

        let result = service(db).reject(&admin(), "r1").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_approve_missing_resource() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<resource::Model>::new()])
            .into_connection();

        let result = service(db).approve(&admin(), "missing").await;

        assert!(matches!(result, Err(AppError::ResourceNotFound(_))));
    }
}
