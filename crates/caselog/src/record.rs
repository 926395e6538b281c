//! Case records and the draft used to edit them.
//!
//! A [`Record`] is the only entity caselog stores. Front ends never edit a
//! stored record in place: they take a [`Draft`], change it locally, and
//! write it back with a single [`Draft::commit`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::storage::RecordStore;

/// A single case entry.
///
/// Every field has a default so a freshly constructed record is always
/// displayable. Only `id` is fixed for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: Uuid,
    title: String,
    #[serde(deserialize_with = "deserialize_millis")]
    occurred_at: DateTime<Utc>,
    resolved: bool,
    suspect: String,
}

impl Record {
    /// Create a record with a fresh id, empty text fields, unresolved,
    /// occurring now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Create a record with the given id and default fields.
    #[must_use]
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            title: String::new(),
            occurred_at: truncate_to_millis(Utc::now()),
            resolved: false,
            suspect: String::new(),
        }
    }

    /// The record's persistent key.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The case title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the case title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// When the case occurred.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Set when the case occurred.
    ///
    /// Sub-millisecond precision is dropped; the store keeps milliseconds.
    pub fn set_occurred_at(&mut self, occurred_at: DateTime<Utc>) {
        self.occurred_at = truncate_to_millis(occurred_at);
    }

    /// Whether the case has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Mark the case resolved or unresolved.
    pub fn set_resolved(&mut self, resolved: bool) {
        self.resolved = resolved;
    }

    /// The suspect's name, empty when none has been chosen.
    #[must_use]
    pub fn suspect(&self) -> &str {
        &self.suspect
    }

    /// Set the suspect's name.
    pub fn set_suspect(&mut self, suspect: impl Into<String>) {
        self.suspect = suspect.into();
    }

    /// Check whether a suspect has been named.
    #[must_use]
    pub fn has_suspect(&self) -> bool {
        !self.suspect.is_empty()
    }

    /// File name of the photo associated with this record.
    ///
    /// Derived from the id only. The file may or may not exist.
    #[must_use]
    pub fn photo_filename(&self) -> String {
        format!("IMG_{}.jpg", self.id)
    }

    /// Rebuild a record from stored column values.
    pub(crate) fn from_parts(
        id: Uuid,
        title: String,
        occurred_at: DateTime<Utc>,
        resolved: bool,
        suspect: String,
    ) -> Self {
        Self {
            id,
            title,
            occurred_at,
            resolved,
            suspect,
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop everything below whole milliseconds.
pub(crate) fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    DateTime::<Utc>::deserialize(deserializer).map(truncate_to_millis)
}

/// An editing session over a copy of a record.
///
/// The draft owns its copy outright, so nothing else observes the edits
/// until [`Draft::commit`] writes them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    record: Record,
    dirty: bool,
}

impl Draft {
    /// Start editing a copy of `record`.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            record: record.clone(),
            dirty: false,
        }
    }

    /// Load a record from the store and start editing it.
    ///
    /// Returns `None` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn load(store: &RecordStore, id: &Uuid) -> Result<Option<Self>> {
        Ok(store.get_by_id(id)?.map(|record| Self {
            record,
            dirty: false,
        }))
    }

    /// The record as currently edited.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Whether any field changed since the draft was taken.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        let title = title.into();
        if self.record.title != title {
            self.record.title = title;
            self.dirty = true;
        }
        self
    }

    /// Set when the case occurred.
    pub fn set_occurred_at(&mut self, occurred_at: DateTime<Utc>) -> &mut Self {
        let occurred_at = truncate_to_millis(occurred_at);
        if self.record.occurred_at != occurred_at {
            self.record.occurred_at = occurred_at;
            self.dirty = true;
        }
        self
    }

    /// Set the resolved flag.
    pub fn set_resolved(&mut self, resolved: bool) -> &mut Self {
        if self.record.resolved != resolved {
            self.record.resolved = resolved;
            self.dirty = true;
        }
        self
    }

    /// Set the suspect.
    pub fn set_suspect(&mut self, suspect: impl Into<String>) -> &mut Self {
        let suspect = suspect.into();
        if self.record.suspect != suspect {
            self.record.suspect = suspect;
            self.dirty = true;
        }
        self
    }

    /// Write the edited record back to the store with one update.
    ///
    /// A clean draft writes nothing and returns `false`. Otherwise returns
    /// whether a stored row was overwritten; `false` means the record was
    /// deleted while the draft was open.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn commit(&mut self, store: &RecordStore) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let updated = store.update(&self.record)?;
        self.dirty = false;
        Ok(updated)
    }

    /// Finish editing and take the record.
    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }
}
