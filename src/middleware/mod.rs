pub mod auth;
pub mod guard;

pub use auth::{auth_middleware, BearerToken, CurrentUser};
pub use guard::{NotificationViewer, RosterEditor, RosterViewer, Superuser};
