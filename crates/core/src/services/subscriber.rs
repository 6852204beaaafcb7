//! Newsletter subscriber service.

use chrono::{Duration, Utc};
use portfolio_common::{AppError, AppResult, IdGenerator, page_offset};
use portfolio_db::{entities::subscriber, repositories::SubscriberRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Window used for the "recent signups" stat.
const RECENT_DAYS: i64 = 30;

/// Input for a newsletter signup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeInput {
    /// Email address to subscribe.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Outcome of a signup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A brand-new subscription was created.
    Subscribed(subscriber::Model),
    /// A previously unsubscribed address was reactivated.
    Reactivated(subscriber::Model),
    /// The address is already actively subscribed.
    AlreadySubscribed,
}

/// Aggregate subscriber counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberStats {
    /// All subscriber rows.
    pub total: u64,
    /// Currently active subscribers.
    pub active: u64,
    /// Unsubscribed rows kept for history.
    pub inactive: u64,
    /// Signups in the last thirty days.
    pub recent: u64,
}

/// A page of subscribers with the total for the active search.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberList {
    /// The page of subscribers.
    pub subscribers: Vec<subscriber::Model>,
    /// Total rows matching the search, ignoring pagination.
    pub total: u64,
}

/// Subscriber service for business logic.
#[derive(Clone)]
pub struct SubscriberService {
    subscriber_repo: SubscriberRepository,
    id_gen: IdGenerator,
}

impl SubscriberService {
    /// Create a new subscriber service.
    #[must_use]
    pub fn new(subscriber_repo: SubscriberRepository) -> Self {
        Self {
            subscriber_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Subscribe an email address. Re-subscribing an unsubscribed address
    /// reactivates the existing row instead of creating a duplicate.
    pub async fn subscribe(&self, input: SubscribeInput) -> AppResult<SubscribeOutcome> {
        input.validate()?;
        let email = Self::normalize_email(&input.email);

        if let Some(existing) = self.subscriber_repo.find_by_email(&email).await? {
            if existing.is_active {
                return Ok(SubscribeOutcome::AlreadySubscribed);
            }

            let reactivated = self.subscriber_repo.reactivate(existing).await?;
            tracing::info!(subscriber_id = %reactivated.id, "subscriber reactivated");

            return Ok(SubscribeOutcome::Reactivated(reactivated));
        }

        let model = subscriber::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            is_active: Set(true),
            subscribed_at: Set(Utc::now().into()),
            last_email_sent: Set(None),
            unsubscribe_token: Set(self.id_gen.generate_token()),
        };

        let created = self.subscriber_repo.create(model).await?;
        tracing::info!(subscriber_id = %created.id, "subscriber created");

        Ok(SubscribeOutcome::Subscribed(created))
    }

    /// Unsubscribe by opaque token. Returns false for unknown tokens;
    /// unsubscribing twice is a no-op that still reports success.
    pub async fn unsubscribe(&self, token: &str) -> AppResult<bool> {
        let Some(existing) = self.subscriber_repo.find_by_token(token).await? else {
            return Ok(false);
        };

        if existing.is_active {
            let updated = self.subscriber_repo.set_active(existing, false).await?;
            tracing::info!(subscriber_id = %updated.id, "subscriber unsubscribed");
        }

        Ok(true)
    }

    /// Admin toggle of a subscriber's active flag.
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<subscriber::Model> {
        let existing = self
            .subscriber_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscriber not found".to_string()))?;

        self.subscriber_repo.set_active(existing, is_active).await
    }

    /// Permanently delete a subscriber row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.subscriber_repo.delete(id).await? {
            return Err(AppError::NotFound("Subscriber not found".to_string()));
        }

        Ok(())
    }

    /// List subscribers for the admin view, with optional email search.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<SubscriberList> {
        let offset = page_offset(page, page_size)?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let subscribers = self.subscriber_repo.list(search, page_size, offset).await?;
        let total = self.subscriber_repo.count(search).await?;

        Ok(SubscriberList { subscribers, total })
    }

    /// Aggregate counts for the admin dashboard.
    pub async fn stats(&self) -> AppResult<SubscriberStats> {
        let total = self.subscriber_repo.count(None).await?;
        let active = self.subscriber_repo.count_active().await?;
        let recent = self
            .subscriber_repo
            .count_since(Utc::now() - Duration::days(RECENT_DAYS))
            .await?;

        Ok(SubscriberStats {
            total,
            active,
            inactive: total.saturating_sub(active),
            recent,
        })
    }

    /// Export active subscribers as CSV.
    pub async fn export_active_csv(&self) -> AppResult<String> {
        let subscribers = self.subscriber_repo.find_active().await?;

        let mut csv = String::from("Email,Status,Subscribed Date,Last Email Sent\n");
        for sub in subscribers {
            let last_sent = sub
                .last_email_sent
                .map_or_else(|| "Never".to_string(), |at| at.format("%m/%d/%Y").to_string());

            csv.push_str(&format!(
                "{},Active,{},{}\n",
                sub.email,
                sub.subscribed_at.format("%m/%d/%Y"),
                last_sent
            ));
        }

        Ok(csv)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_subscriber(id: &str, email: &str, is_active: bool) -> subscriber::Model {
        subscriber::Model {
            id: id.to_string(),
            email: email.to_string(),
            is_active,
            subscribed_at: "2025-06-01T12:00:00Z".parse().unwrap(),
            last_email_sent: None,
            unsubscribe_token: format!("token-{id}"),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> SubscriberService {
        SubscriberService::new(SubscriberRepository::new(Arc::new(db)))
    }

    #[test]
    fn test_subscribe_input_rejects_bad_email() {
        let input = SubscribeInput {
            email: "not-an-email".to_string(),
        };

        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_subscribe_active_address_is_already_subscribed() {
        let existing = create_test_subscriber("s1", "a@x.com", true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        let outcome = service(db)
            .subscribe(SubscribeInput {
                email: "A@X.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, SubscribeOutcome::AlreadySubscribed);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<subscriber::Model>::new()])
            .into_connection();

        assert!(!service(db).unsubscribe("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_unsubscribe_inactive_token_is_noop_success() {
        let existing = create_test_subscriber("s1", "a@x.com", false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        assert!(service(db).unsubscribe("token-s1").await.unwrap());
    }

    #[tokio::test]
    async fn test_export_csv_header_and_rows() {
        let mut stamped = create_test_subscriber("s1", "a@x.com", true);
        stamped.last_email_sent = Some("2025-06-08T12:00:00Z".parse().unwrap());
        let never = create_test_subscriber("s2", "b@x.com", true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stamped, never]])
            .into_connection();

        let csv = service(db).export_active_csv().await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Email,Status,Subscribed Date,Last Email Sent");
        assert_eq!(lines[1], "a@x.com,Active,06/01/2025,06/08/2025");
        assert_eq!(lines[2], "b@x.com,Active,06/01/2025,Never");
    }

    #[tokio::test]
    async fn test_stats_inactive_is_total_minus_active() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(10)) }],
                vec![maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(7)) }],
                vec![maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(3)) }],
            ])
            .into_connection();

        let stats = service(db).stats().await.unwrap();

        assert_eq!(stats.total, 10);
        assert_eq!(stats.active, 7);
        assert_eq!(stats.inactive, 3);
        assert_eq!(stats.recent, 3);
    }
}
