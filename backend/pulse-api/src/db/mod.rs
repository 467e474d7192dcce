//! sqlx repositories for pulse-api.

pub mod post_repo;
pub mod reaction_repo;
pub mod user_repo;
