//! Security module: password hashing and JWT token management.

pub mod jwt;
pub mod password;

pub use jwt::{issue_token, validate_token, Claims};
pub use password::{hash_password, verify_password};
