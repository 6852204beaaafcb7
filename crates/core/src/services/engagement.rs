//! Download and like tracking.

use chrono::Utc;
use portfolio_common::{AppError, AppResult, IdGenerator};
use portfolio_db::{
    entities::{download_event, resource::ResourceStatus, resource_like},
    repositories::{
        DownloadEventRepository, LikeInsert, ResourceLikeRepository, ResourceRepository,
    },
};
use sea_orm::Set;

/// Outcome of a like attempt from a given address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The like was recorded; carries the new total for the resource.
    Liked(u64),
    /// This address already liked the resource.
    AlreadyLiked,
}

/// Engagement service tracking downloads and likes per resource.
#[derive(Clone)]
pub struct EngagementService {
    resource_repo: ResourceRepository,
    download_repo: DownloadEventRepository,
    like_repo: ResourceLikeRepository,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
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

    async fn require_approved(&self, resource_id: &str) -> AppResult<()> {
        let resource = self
            .resource_repo
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(resource_id.to_string()))?;

        // Unapproved resources are invisible to the public, so they
        // read as missing here too.
        if resource.status != ResourceStatus::Approved {
            return Err(AppError::ResourceNotFound(resource_id.to_string()));
        }

        Ok(())
    }

    /// Record a download event and return the new total. Tracking failures
    /// are logged but never surface to the caller; the download itself must
    /// not break.
    pub async fn record_download(
        &self,
        resource_id: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> u64 {
        let model = download_event::ActiveModel {
            id: Set(self.id_gen.generate()),
            resource_id: Set(resource_id.to_string()),
            ip_address: Set(ip_address.map(ToString::to_string)),
            user_agent: Set(user_agent.map(ToString::to_string)),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = self.download_repo.create(model).await {
            tracing::warn!(resource_id, error = %e, "failed to record download");
        }

        match self.download_repo.count_by_resource(resource_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(resource_id, error = %e, "failed to count downloads");
                0
            }
        }
    }

    /// Like a resource from a client address. At most one like per
    /// (resource, address) pair; repeats report `AlreadyLiked`.
    pub async fn like(
        &self,
        resource_id: &str,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> AppResult<LikeOutcome> {
        self.require_approved(resource_id).await?;

        // Fast path; the unique index on (resource_id, ip_address)
        // backstops the race between this check and the insert.
        if self.like_repo.has_liked(resource_id, ip_address).await? {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let model = resource_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            resource_id: Set(resource_id.to_string()),
            ip_address: Set(ip_address.to_string()),
            user_agent: Set(user_agent.map(ToString::to_string)),
            created_at: Set(Utc::now().into()),
        };

        match self.like_repo.create(model).await? {
            LikeInsert::Created(_) => {
                let count = self.like_repo.count_by_resource(resource_id).await?;
                Ok(LikeOutcome::Liked(count))
            }
            LikeInsert::Duplicate => Ok(LikeOutcome::AlreadyLiked),
        }
    }

    /// Whether this address has already liked the resource.
    pub async fn has_liked(&self, resource_id: &str, ip_address: &str) -> AppResult<bool> {
        self.like_repo.has_liked(resource_id, ip_address).await
    }

    /// Current like total for a resource.
    pub async fn like_count(&self, resource_id: &str) -> AppResult<u64> {
        self.like_repo.count_by_resource(resource_id).await
    }
}
