//! Weekly digest generation and delivery.

use std::collections::HashMap;

use crate::services::email::Mailer;
use chrono::{Duration, Utc};
use portfolio_common::{AppError, AppResult, IdGenerator, SiteConfig, page_offset};
use portfolio_db::{
    entities::{resource, weekly_email},
    repositories::{
        ResourceLikeRepository, ResourceRepository, SubscriberRepository, WeeklyEmailRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;

/// A resource ranked into the digest.
#[derive(Debug, Clone, Serialize)]
pub struct TopResource {
    /// Position in the digest, starting at 1.
    pub rank: usize,
    /// The resource.
    #[serde(flatten)]
    pub resource: resource::Model,
    /// Likes accumulated inside the digest window.
    pub likes: u64,
}

/// A rendered digest that has not been sent.
#[derive(Debug, Clone, Serialize)]
pub struct DigestPreview {
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
    /// The ranked resources behind the rendering.
    pub top_resources: Vec<TopResource>,
    /// Active subscribers the digest would go to.
    pub recipient_count: u64,
}

/// Result of sending a digest.
#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    /// The persisted send record.
    pub record: weekly_email::Model,
    /// Recipients the transport accepted the message for.
    pub accepted: usize,
}

/// Digest service: ranks the week's resources and mails subscribers.
#[derive(Clone)]
pub struct DigestService {
    resource_repo: ResourceRepository,
    like_repo: ResourceLikeRepository,
    subscriber_repo: SubscriberRepository,
    weekly_email_repo: WeeklyEmailRepository,
    mailer: Mailer,
    site: SiteConfig,
    site_url: String,
    id_gen: IdGenerator,
}

impl DigestService {
    /// Create a new digest service.
    #[must_use]
    pub fn new(
        resource_repo: ResourceRepository,
        like_repo: ResourceLikeRepository,
        subscriber_repo: SubscriberRepository,
        weekly_email_repo: WeeklyEmailRepository,
        mailer: Mailer,
        site: SiteConfig,
        site_url: String,
    ) -> Self {
        Self {
            resource_repo,
            like_repo,
            subscriber_repo,
            weekly_email_repo,
            mailer,
            site,
            site_url,
            id_gen: IdGenerator::new(),
        }
    }

    /// Rank approved resources by likes received inside the digest
    /// window. Ties go to the older resource.
    pub async fn top_resources(&self) -> AppResult<Vec<TopResource>> {
        let cutoff = Utc::now() - Duration::days(self.site.digest_window_days);
        let likes = self.like_repo.find_since(cutoff).await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for like in likes {
            *counts.entry(like.resource_id).or_insert(0) += 1;
        }

        let ids: Vec<String> = counts.keys().cloned().collect();
        let resources = self.resource_repo.find_approved_by_ids(&ids).await?;

        let mut ranked: Vec<(resource::Model, u64)> = resources
            .into_iter()
            .map(|r| {
                let likes = counts.get(&r.id).copied().unwrap_or(0);
                (r, likes)
            })
            .collect();

        ranked.sort_by(|(a, a_likes), (b, b_likes)| {
            b_likes.cmp(a_likes).then(a.created_at.cmp(&b.created_at))
        });
        ranked.truncate(self.site.digest_limit);

        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(i, (resource, likes))| TopResource {
                rank: i + 1,
                resource,
                likes,
            })
            .collect())
    }

    /// Render the digest without sending it.
    pub async fn preview(&self) -> AppResult<DigestPreview> {
        let top_resources = self.top_resources().await?;
        let recipient_count = self.subscriber_repo.count_active().await?;

        let subject = self.render_subject(top_resources.len());
        let html = self.render_html(&top_resources);

        Ok(DigestPreview {
            subject,
            html,
            top_resources,
            recipient_count,
        })
    }

    /// Generate the digest, persist the send record, stamp subscribers
    /// and hand the message to the transport.
    pub async fn generate_and_send(&self) -> AppResult<SendReport> {
        let subscribers = self.subscriber_repo.find_active().await?;
        if subscribers.is_empty() {
            return Err(AppError::NoSubscribers);
        }

        let top_resources = self.top_resources().await?;
        let subject = self.render_subject(top_resources.len());
        let html = self.render_html(&top_resources);

        let now = Utc::now();
        let record = self
            .weekly_email_repo
            .create(weekly_email::ActiveModel {
                id: Set(self.id_gen.generate()),
                sent_at: Set(now.into()),
                subscriber_count: Set(subscribers.len() as i64),
                top_resources: Set(serde_json::to_value(&top_resources)
                    .map_err(|e| AppError::Internal(e.to_string()))?),
                email_subject: Set(subject.clone()),
                email_content: Set(html.clone()),
            })
            .await?;

        self.subscriber_repo.stamp_last_email_sent(now).await?;

        let recipients: Vec<String> = subscribers.into_iter().map(|s| s.email).collect();
        let delivery = self.mailer.send(&recipients, &subject, &html).await?;

        tracing::info!(
            record_id = %record.id,
            recipients = recipients.len(),
            accepted = delivery.accepted,
            "weekly digest sent"
        );

        Ok(SendReport {
            record,
            accepted: delivery.accepted,
        })
    }

    /// Past send records, most recent first.
    pub async fn history(
        &self,
        page: u64,
        page_size: u64,
    ) -> AppResult<(Vec<weekly_email::Model>, u64)> {
        let offset = page_offset(page, page_size)?;
        let records = self.weekly_email_repo.list(page_size, offset).await?;
        let total = self.weekly_email_repo.count().await?;

        Ok((records, total))
    }

    fn render_subject(&self, count: usize) -> String {
        format!("Top {} Resources - {}", count, Utc::now().format("%-m/%-d/%Y"))
    }

    // Submitted fields end up inside the rendered document, so they are
    // escaped even though moderation gates what can rank.
    fn escape_html(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    fn render_html(&self, top: &[TopResource]) -> String {
        let mut items = String::new();
        for entry in top {
            let r = &entry.resource;
            let size = r
                .size
                .as_deref()
                .map(|s| format!(" &middot; {}", Self::escape_html(s)))
                .unwrap_or_default();

            items.push_str(&format!(
                concat!(
                    r#"<div style="border:2px solid #000;padding:16px;margin-bottom:12px;">"#,
                    r#"<div style="font-weight:bold;font-size:16px;">#{rank} {name} "#,
                    r#"<span style="background:#000;color:#fff;padding:2px 6px;font-size:11px;">{rtype}</span></div>"#,
                    r#"<p style="margin:8px 0;">{description}</p>"#,
                    r#"<div style="font-size:12px;">by {author} &middot; {likes} likes{size}</div>"#,
                    r#"<a href="{url}" style="display:inline-block;margin-top:8px;background:#000;color:#fff;"#,
                    r#"padding:8px 14px;text-decoration:none;font-weight:bold;">VIEW RESOURCE</a>"#,
                    r#"</div>"#
                ),
                rank = entry.rank,
                name = Self::escape_html(&r.name),
                rtype = r.r#type.as_label(),
                description = Self::escape_html(&r.description),
                author = Self::escape_html(&r.author),
                likes = entry.likes,
                size = size,
                url = Self::escape_html(&r.download_url),
            ));
        }

        if items.is_empty() {
            items.push_str(r#"<p>No resources were liked this week. Go explore the directory!</p>"#);
        }

        format!(
            concat!(
                r#"<html><body style="font-family:monospace;max-width:600px;margin:0 auto;padding:24px;">"#,
                r#"<h1 style="border-bottom:4px solid #000;padding-bottom:8px;">{site_name}</h1>"#,
                r#"<p>The most liked resources from the past week:</p>"#,
                "{items}",
                r#"<hr style="border:none;border-top:2px solid #000;margin-top:24px;">"#,
                r#"<p style="font-size:11px;">You are receiving this because you subscribed at {site_url}. "#,
                r#"<a href="{site_url}/api/newsletter/unsubscribe">Unsubscribe</a></p>"#,
                r#"</body></html>"#
            ),
            site_name = self.site.name,
            items = items,
            site_url = self.site_url,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::email::LogTransport;
    use portfolio_db::entities::resource::{ResourceCategory, ResourceStatus, ResourceType};
    use portfolio_db::entities::resource_like;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn site() -> SiteConfig {
        SiteConfig {
            name: "BRUTAL.DEV".to_string(),
            owner: None,
            location: None,
            digest_window_days: 7,
            digest_limit: 10,
        }
    }

    fn approved(id: &str, created_days_ago: i64) -> resource::Model {
        resource::Model {
            id: id.to_string(),
            name: format!("Resource {id}"),
            r#type: ResourceType::Figma,
            category: ResourceCategory::DesignSystems,
            description: "A resource".to_string(),
            download_url: "https://example.com/r".to_string(),
            author: "Kim".to_string(),
            size: None,
            date: Utc::now().into(),
            status: ResourceStatus::Approved,
            created_at: (Utc::now() - Duration::days(created_days_ago)).into(),
            updated_at: None,
        }
    }

    fn like(id: &str, resource_id: &str) -> resource_like::Model {
        resource_like::Model {
            id: id.to_string(),
            resource_id: resource_id.to_string(),
            ip_address: format!("ip-{id}"),
            user_agent: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> DigestService {
        let db = Arc::new(db);
        DigestService::new(
            ResourceRepository::new(Arc::clone(&db)),
            ResourceLikeRepository::new(Arc::clone(&db)),
            SubscriberRepository::new(Arc::clone(&db)),
            WeeklyEmailRepository::new(db),
            Arc::new(LogTransport),
            site(),
            "https://example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn test_top_resources_ranked_by_likes_then_age() {
        // r1: 1 like, r2: 2 likes, r3: 1 like but older than r1
        let likes = vec![
            like("l1", "r1"),
            like("l2", "r2"),
            like("l3", "r2"),
            like("l4", "r3"),
        ];
        let resources = vec![approved("r1", 1), approved("r2", 2), approved("r3", 5)];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([likes])
            .append_query_results([resources])
            .into_connection();

        let top = service(db).top_resources().await.unwrap();

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].resource.id, "r2");
        assert_eq!(top[0].likes, 2);
        assert_eq!(top[0].rank, 1);
        // tie between r1 and r3 resolved by older created_at
        assert_eq!(top[1].resource.id, "r3");
        assert_eq!(top[2].resource.id, "r1");
    }

    #[tokio::test]
    async fn test_top_resources_empty_week() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<resource_like::Model>::new()])
            .into_connection();

        let top = service(db).top_resources().await.unwrap();

        assert!(top.is_empty());
    }

    #[tokio::test]
    async fn test_generate_and_send_without_subscribers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<portfolio_db::entities::subscriber::Model>::new()])
            .into_connection();

        let result = service(db).generate_and_send().await;

        assert!(matches!(result, Err(AppError::NoSubscribers)));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            DigestService::escape_html(r#"<b>"A&B"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_html_escapes_submitted_fields() {
        let mut resource = approved("r1", 1);
        resource.name = "<script>alert(1)</script>".to_string();
        resource.author = "Kim & Co".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let html = service(db).render_html(&[TopResource {
            rank: 1,
            resource,
            likes: 4,
        }]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Kim &amp; Co"));
    }

    #[test]
    fn test_subject_line_shape() {
        let subject = format!("Top {} Resources - {}", 10, Utc::now().format("%-m/%-d/%Y"));

        assert!(subject.starts_with("Top 10 Resources - "));
    }
}
