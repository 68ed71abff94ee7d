pub mod admin;
pub mod auth;
pub mod members;
pub mod notifications;

pub use admin::AdminService;
pub use auth::AuthService;
pub use members::MemberService;
pub use notifications::{NotificationService, Notifier};
