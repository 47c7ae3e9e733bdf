//! Entity models and DTOs.

pub mod user;
