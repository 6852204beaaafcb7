//! Database entities.

pub mod admin_session;
pub mod admin_user;
pub mod download_event;
pub mod guestbook_entry;
pub mod resource;
pub mod resource_like;
pub mod subscriber;
pub mod weekly_email;

pub use admin_session::Entity as AdminSession;
pub use admin_user::Entity as AdminUser;
pub use download_event::Entity as DownloadEvent;
pub use guestbook_entry::Entity as GuestbookEntry;
pub use resource::Entity as Resource;
pub use resource_like::Entity as ResourceLike;
pub use subscriber::Entity as Subscriber;
pub use weekly_email::Entity as WeeklyEmail;
