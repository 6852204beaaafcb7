//! Guestbook service.

use chrono::{DateTime, FixedOffset, Utc};
use portfolio_common::{AppResult, IdGenerator, page_offset, pagination};
use portfolio_db::{entities::guestbook_entry, repositories::GuestbookRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Trophy metals for the three oldest signatures.
const TROPHY_RANKS: [&str; 3] = ["gold", "silver", "bronze"];

/// Server-side caps, applied after trimming. Client-side limits are
/// not trustworthy, so over-long input is truncated rather than stored.
const NAME_MAX: usize = 32;
const MESSAGE_MAX: usize = 180;
const LOCATION_MAX: usize = 32;

/// Input for signing the guestbook. Over-long fields are capped on the
/// way in, not rejected.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignGuestbookInput {
    /// Signer's display name, capped at 32 chars.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Message for the wall, capped at 180 chars.
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    /// Optional location ("Berlin", "the couch"), capped at 32 chars.
    pub location: Option<String>,
}

fn cap(value: &str, max: usize) -> String {
    value.trim().chars().take(max).collect()
}

/// A guestbook entry as shown to the public, with client metadata
/// stripped.
#[derive(Debug, Clone, Serialize)]
pub struct PublicEntry {
    /// Entry ID.
    pub id: String,
    /// Signer's name.
    pub name: String,
    /// Message text.
    pub message: String,
    /// Optional location.
    pub location: Option<String>,
    /// When the entry was signed.
    pub created_at: DateTime<FixedOffset>,
}

/// One of the three oldest entries, ranked by metal.
#[derive(Debug, Clone, Serialize)]
pub struct TrophyEntry {
    /// Trophy metal: gold, silver or bronze.
    pub rank: &'static str,
    /// The entry itself.
    #[serde(flatten)]
    pub entry: PublicEntry,
}

/// A page of public guestbook entries.
#[derive(Debug, Clone, Serialize)]
pub struct GuestbookPage {
    /// Entries in the requested order.
    pub entries: Vec<PublicEntry>,
    /// Total entries in the guestbook.
    pub total: u64,
    /// Whether more entries exist past this page.
    pub has_more: bool,
}

impl From<guestbook_entry::Model> for PublicEntry {
    fn from(model: guestbook_entry::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            message: model.message,
            location: model.location,
            created_at: model.created_at,
        }
    }
}

/// Guestbook service for business logic.
#[derive(Clone)]
pub struct GuestbookService {
    guestbook_repo: GuestbookRepository,
    id_gen: IdGenerator,
}

impl GuestbookService {
    /// Create a new guestbook service.
    #[must_use]
    pub fn new(guestbook_repo: GuestbookRepository) -> Self {
        Self {
            guestbook_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Sign the guestbook.
    pub async fn sign(
        &self,
        input: SignGuestbookInput,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> AppResult<PublicEntry> {
        input.validate()?;

        let model = guestbook_entry::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(cap(&input.name, NAME_MAX)),
            message: Set(cap(&input.message, MESSAGE_MAX)),
            location: Set(input
                .location
                .as_deref()
                .map(|l| cap(l, LOCATION_MAX))
                .filter(|l| !l.is_empty())),
            ip_address: Set(ip_address.map(ToString::to_string)),
            user_agent: Set(user_agent.map(ToString::to_string)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.guestbook_repo.create(model).await?;
        tracing::info!(entry_id = %created.id, "guestbook signed");

        Ok(created.into())
    }

    /// A page of public entries, newest first, with any trophy entries
    /// on the page pulled to the front.
    pub async fn entries(&self, page: u64, page_size: u64) -> AppResult<GuestbookPage> {
        let offset = page_offset(page, page_size)?;
        let rows = self.guestbook_repo.list(page_size, offset, false).await?;
        let total = self.guestbook_repo.count().await?;
        let trophy_ids: Vec<String> = self
            .guestbook_repo
            .oldest(TROPHY_RANKS.len() as u64)
            .await?
            .into_iter()
            .map(|model| model.id)
            .collect();

        Ok(Self::shape_page(&trophy_ids, rows, total, page, page_size))
    }

    /// The three oldest signatures, crowned gold, silver and bronze.
    pub async fn trophy_entries(&self) -> AppResult<Vec<TrophyEntry>> {
        let oldest = self
            .guestbook_repo
            .oldest(TROPHY_RANKS.len() as u64)
            .await?;

        Ok(oldest
            .into_iter()
            .zip(TROPHY_RANKS)
            .map(|(model, rank)| TrophyEntry {
                rank,
                entry: model.into(),
            })
            .collect())
    }

    /// Full entries including client metadata, for the admin view.
    pub async fn admin_entries(
        &self,
        page: u64,
        page_size: u64,
    ) -> AppResult<(Vec<guestbook_entry::Model>, u64)> {
        let offset = page_offset(page, page_size)?;
        let rows = self.guestbook_repo.list(page_size, offset, false).await?;
        let total = self.guestbook_repo.count().await?;

        Ok((rows, total))
    }

    // Trophy entries that landed on this page move to the front in trophy
    // order; everything else keeps its newest-first order.
    fn shape_page(
        trophy_ids: &[String],
        rows: Vec<guestbook_entry::Model>,
        total: u64,
        page: u64,
        page_size: u64,
    ) -> GuestbookPage {
        let (mut front, rest): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .partition(|row| trophy_ids.contains(&row.id));
        front.sort_by_key(|row| trophy_ids.iter().position(|id| id == &row.id));

        GuestbookPage {
            entries: front.into_iter().chain(rest).map(Into::into).collect(),
            total,
            has_more: pagination::has_more(page, page_size, total),
        }
    }
}
