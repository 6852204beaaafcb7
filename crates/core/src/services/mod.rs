//! Business logic services.

pub mod auth;
pub mod digest;
pub mod email;
pub mod engagement;
pub mod guestbook;
pub mod moderation;
pub mod resource;
pub mod subscriber;

pub use auth::{AdminPrincipal, AuthService, LoginInput, SESSION_TTL_HOURS};
pub use digest::{DigestPreview, DigestService, SendReport, TopResource};
pub use email::{DeliveryResult, EmailTransport, LogTransport, Mailer};
pub use engagement::{EngagementService, LikeOutcome};
pub use guestbook::{GuestbookPage, GuestbookService, PublicEntry, SignGuestbookInput, TrophyEntry};
pub use moderation::ModerationService;
pub use resource::{ResourceList, ResourceService, ResourceView, SubmitResourceInput};
pub use subscriber::{
    SubscribeInput, SubscribeOutcome, SubscriberList, SubscriberService, SubscriberStats,
};
