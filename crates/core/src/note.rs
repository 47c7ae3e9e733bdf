//! Note entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::types::{NoteId, Timestamp};

/// Title given to freshly created notes before the user renames them.
pub const DEFAULT_TITLE: &str = "Untitled Note";

/// A titled text document with creation/modification timestamps.
///
/// Timestamps serialize as RFC 3339 strings (chrono's serde default) so a
/// persisted collection round-trips with timestamp equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

/// Partial update applied to an existing note. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNote {
    /// Fold a later edit into this one. Fields supplied by `later` win.
    pub fn merge(&mut self, later: UpdateNote) {
        if later.title.is_some() {
            self.title = later.title;
        }
        if later.content.is_some() {
            self.content = later.content;
        }
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_later_fields_win() {
        let mut patch = UpdateNote {
            title: Some("first".into()),
            content: Some("body".into()),
        };
        patch.merge(UpdateNote {
            title: Some("second".into()),
            content: None,
        });
        assert_eq!(patch.title.as_deref(), Some("second"));
        assert_eq!(patch.content.as_deref(), Some("body"));
    }

    #[test]
    fn merge_none_preserves_existing() {
        let mut patch = UpdateNote {
            title: None,
            content: Some("kept".into()),
        };
        patch.merge(UpdateNote::default());
        assert_eq!(patch.content.as_deref(), Some("kept"));
        assert!(patch.title.is_none());
    }

    #[test]
    fn empty_patch() {
        assert!(UpdateNote::default().is_empty());
        assert!(!UpdateNote {
            title: Some("t".into()),
            content: None
        }
        .is_empty());
    }
}
