//! The note store: owns the ordered note collection, persists it to a
//! blob store on every change, and implements creation, update, deletion,
//! and duplication with the title-uniqueness policy from [`crate::titles`].
//!
//! The store is synchronous and assumes a single logical owner issuing
//! one operation at a time (one rendering/control surface). A
//! multi-writer adapter must add its own mutual exclusion around each
//! read-modify-persist sequence.
//!
//! No operation here raises a caller-visible error: unknown identifiers
//! are silently ignored and persistence failures are logged, leaving the
//! in-memory collection as the source of truth for the session.

use chrono::Utc;
use uuid::Uuid;

use crate::note::{Note, UpdateNote, DEFAULT_TITLE};
use crate::storage::BlobStore;
use crate::titles::{next_available_title, strip_copy_suffix};
use crate::types::{NoteId, Timestamp};

/// Fixed blob-store key holding the serialized note collection.
pub const STORAGE_KEY: &str = "notes-app-data";

/// Clock collaborator. Injected so tests can drive time deterministically.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock UTC time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Identifier-generator collaborator.
pub trait IdGenerator {
    fn new_id(&mut self) -> NoteId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&mut self) -> NoteId {
        Uuid::new_v4().to_string()
    }
}

/// Owns the note collection. Insertion order is significant: `create`
/// prepends (newest first) and `duplicate` inserts right after its source.
pub struct NoteStore<S, C = SystemClock, G = UuidGenerator> {
    notes: Vec<Note>,
    storage: S,
    clock: C,
    ids: G,
}

impl<S: BlobStore> NoteStore<S> {
    /// Open a store with the production clock and id generator,
    /// rehydrating any previously persisted collection.
    pub fn open(storage: S) -> Self {
        Self::load(storage, SystemClock, UuidGenerator)
    }
}

impl<S: BlobStore, C: Clock, G: IdGenerator> NoteStore<S, C, G> {
    /// Rehydrate the collection from `storage` under [`STORAGE_KEY`].
    ///
    /// A missing blob yields an empty collection. A corrupt blob is
    /// reported and also yields an empty collection -- it is not fatal
    /// to the host process.
    pub fn load(storage: S, clock: C, ids: G) -> Self {
        let notes = match storage.get(STORAGE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Note>>(&blob) {
                Ok(notes) => notes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to parse persisted notes, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read persisted notes, starting empty");
                Vec::new()
            }
        };

        Self {
            notes,
            storage,
            clock,
            ids,
        }
    }

    /// Readable snapshot of the current ordered collection, for
    /// rendering and search filtering by the caller.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Look up a single note by id.
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Create a new empty note at the head of the collection and return
    /// its id. The title starts from `"Untitled Note"` and is
    /// de-duplicated against the live collection.
    pub fn create(&mut self) -> NoteId {
        let title = next_available_title(&self.notes, DEFAULT_TITLE, None);
        let now = self.clock.now();
        let id = self.ids.new_id();

        self.notes.insert(
            0,
            Note {
                id: id.clone(),
                title,
                content: String::new(),
                created_at: now,
                updated_at: now,
            },
        );
        self.persist();
        id
    }

    /// Apply a partial update to the note with `id`.
    ///
    /// Unknown ids are a silent no-op. A supplied title is replaced by
    /// its de-duplicated form, excluding the note itself from the
    /// collision scan so a note keeps its own current title unchanged.
    /// `updated_at` is refreshed whenever the note is found.
    pub fn update(&mut self, id: &str, patch: UpdateNote) {
        let Some(idx) = self.notes.iter().position(|n| n.id == id) else {
            return;
        };

        // Dedup against the collection before taking the mutable borrow.
        let title = patch
            .title
            .as_deref()
            .map(|t| next_available_title(&self.notes, t, Some(id)));
        let now = self.clock.now();

        let note = &mut self.notes[idx];
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        note.updated_at = now;

        self.persist();
    }

    /// Remove the note with `id`, if present. Idempotent.
    pub fn delete(&mut self, id: &str) {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() != before {
            self.persist();
        }
    }

    /// Duplicate the note with `id`, returning the new note's id.
    ///
    /// The duplicate is treated as newly authored: fresh id, fresh
    /// timestamps, content copied verbatim. Its title is derived by
    /// stripping one trailing ` (N)` suffix from the source title and
    /// de-duplicating from that base, so duplicating `"Report (2)"`
    /// yields `"Report (3)"` rather than `"Report (2) (1)"`. The copy is
    /// inserted immediately after its source, not at the head.
    ///
    /// Returns `None` without mutating anything when `id` is unknown.
    pub fn duplicate(&mut self, id: &str) -> Option<NoteId> {
        let idx = self.notes.iter().position(|n| n.id == id)?;

        let base = strip_copy_suffix(&self.notes[idx].title).to_string();
        let title = next_available_title(&self.notes, &base, None);
        let content = self.notes[idx].content.clone();
        let now = self.clock.now();
        let new_id = self.ids.new_id();

        self.notes.insert(
            idx + 1,
            Note {
                id: new_id.clone(),
                title,
                content,
                created_at: now,
                updated_at: now,
            },
        );
        self.persist();
        Some(new_id)
    }

    /// Serialize the whole collection to the blob store. Failures are
    /// absorbed: the in-memory state stays authoritative and the caller
    /// never sees an error.
    fn persist(&mut self) {
        let blob = match serde_json::to_string(&self.notes) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize notes, skipping persist");
                return;
            }
        };
        if let Err(e) = self.storage.set(STORAGE_KEY, &blob) {
            tracing::warn!(error = %e, "failed to persist notes, in-memory state kept");
        }
    }
}
