pub mod admin;
pub mod auth;
pub mod members;
pub mod notifications;
