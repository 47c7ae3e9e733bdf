use crate::types::DbId;

/// Domain-level error type shared across the workspace.
///
/// The Note Store itself never surfaces these (its failure modes are
/// absorbed or logged); they exist for the authentication flows in the
/// api crate, which maps them onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
