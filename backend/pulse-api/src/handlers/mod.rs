//! HTTP handlers for pulse-api

pub mod auth;
pub mod health;
pub mod posts;
pub mod reactions;
pub mod users;

pub use auth::{login, register};
pub use health::{health_summary, liveness_check};
pub use posts::{create_post, get_feed, get_user_posts};
pub use reactions::{dislike_post, get_interaction, like_post};
pub use users::get_user;
