//! Jotter domain core.
//!
//! Owns the note collection and the collaborator traits it is built on
//! (blob store, clock, id generator). Pure domain logic -- no database,
//! no network, no async.

pub mod error;
pub mod note;
pub mod storage;
pub mod store;
pub mod titles;
pub mod types;
