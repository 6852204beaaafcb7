//! Database repositories.

pub mod admin;
pub mod download_event;
pub mod guestbook;
pub mod resource;
pub mod resource_like;
pub mod subscriber;
pub mod weekly_email;

pub use admin::{AdminRepository, AdminSessionRepository};
pub use download_event::DownloadEventRepository;
pub use guestbook::GuestbookRepository;
pub use resource::ResourceRepository;
pub use resource_like::{LikeInsert, ResourceLikeRepository};
pub use subscriber::SubscriberRepository;
pub use weekly_email::WeeklyEmailRepository;
