//! Authentication primitives: JWT session tokens and password hashing.

pub mod jwt;
pub mod password;
