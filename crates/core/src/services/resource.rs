//! Resource directory service.

use chrono::Utc;
use portfolio_common::{AppError, AppResult, IdGenerator, page_offset};
use portfolio_db::{
    entities::resource::{self, ResourceCategory, ResourceStatus, ResourceType},
    repositories::{DownloadEventRepository, ResourceLikeRepository, ResourceRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for a community resource submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitResourceInput {
    /// Display name of the resource.
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    /// Resource type (Figma, SVG, CSS, ...).
    pub r#type: ResourceType,
    /// Directory category.
    pub category: ResourceCategory,
    /// Short description shown in listings.
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
    /// Link to the resource itself.
    #[validate(url(message = "Download URL must be a valid URL"))]
    pub download_url: String,
    /// Credited author or maintainer.
    #[validate(length(min = 1, max = 120, message = "Author must be 1-120 characters"))]
    pub author: String,
    /// Optional human-readable size ("2.4 MB").
    #[validate(length(max = 32, message = "Size must be at most 32 characters"))]
    pub size: Option<String>,
}

/// A resource enriched with engagement counts.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    /// The resource row.
    #[serde(flatten)]
    pub resource: resource::Model,
    /// Number of distinct likes.
    pub like_count: u64,
    /// Number of recorded downloads.
    pub download_count: u64,
}

/// A page of resources with the total count for the active filter.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceList {
    /// The page of resources.
    pub resources: Vec<ResourceView>,
    /// Total rows matching the filter, ignoring pagination.
    pub total: u64,
}

/// Resource service for business logic.
#[derive(Clone)]
pub struct ResourceService {
    resource_repo: ResourceRepository,
    download_repo: DownloadEventRepository,
    like_repo: ResourceLikeRepository,
    id_gen: IdGenerator,
}

impl ResourceService {
    /// Create a new resource service.
    #[must_use]
    pub fn new(
        resource_repo: ResourceRepository,
        download_repo: DownloadEventRepository,
        like_repo: ResourceLikeRepository,
    ) -> Self {
        Self {
            resource_repo,
            download_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new resource. Every submission starts out pending review,
    /// whatever the caller claims.
    pub async fn submit(&self, input: SubmitResourceInput) -> AppResult<resource::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = resource::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            r#type: Set(input.r#type),
            category: Set(input.category),
            description: Set(input.description.trim().to_string()),
            download_url: Set(input.download_url.trim().to_string()),
            author: Set(input.author.trim().to_string()),
            size: Set(input
                .size
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)),
            date: Set(now.into()),
            status: Set(ResourceStatus::Pending),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.resource_repo.create(model).await?;
        tracing::info!(resource_id = %created.id, name = %created.name, "resource submitted");

        Ok(created)
    }

    /// Fetch a single resource by ID.
    pub async fn get(&self, id: &str) -> AppResult<resource::Model> {
        self.resource_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(id.to_string()))
    }

    /// List resources with optional status, category and name/description
    /// search filters, newest first, enriched with engagement counts.
    /// `page` and `page_size` are one-based.
    pub async fn list(
        &self,
        status: Option<ResourceStatus>,
        category: Option<ResourceCategory>,
        search: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<ResourceList> {
        let offset = page_offset(page, page_size)?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let rows = self
            .resource_repo
            .list(status, category, search, page_size, offset)
            .await?;
        let total = self.resource_repo.count(status, category, search).await?;

        let mut resources = Vec::with_capacity(rows.len());
        for row in rows {
            let like_count = self.like_repo.count_by_resource(&row.id).await?;
            let download_count = self.download_repo.count_by_resource(&row.id).await?;
            resources.push(ResourceView {
                resource: row,
                like_count,
                download_count,
            });
        }

        Ok(ResourceList { resources, total })
    }

    /// List approved resources for the public directory.
    pub async fn list_public(
        &self,
        category: Option<ResourceCategory>,
        search: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<ResourceList> {
        self.list(Some(ResourceStatus::Approved), category, search, page, page_size)
            .await
    }

    /// Resources awaiting review, for the admin queue.
    pub async fn pending(&self, page: u64, page_size: u64) -> AppResult<ResourceList> {
        self.list(Some(ResourceStatus::Pending), None, None, page, page_size)
            .await
    }
}
