//! Client-side collaborators for the notes app.
//!
//! [`auth::AuthClient`] talks to the authentication service and keeps the
//! session token in a blob store; [`autosave::Autosave`] implements the
//! debounced commit contract the editor uses so the note store itself
//! stays synchronous and timer-agnostic.

pub mod auth;
pub mod autosave;
