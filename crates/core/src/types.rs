/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Note identifiers are opaque strings (UUID v4 in production).
pub type NoteId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
