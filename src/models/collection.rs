//! Live record collections that imports are merged into.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Opaque record identity, assigned once when a record joins a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A record together with its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// Identity, never recomputed from content.
    pub id: RecordId,
    /// The record itself.
    #[serde(flatten)]
    pub record: T,
}

/// An ordered, append-only collection of identified records.
///
/// Merging never replaces or rewrites existing entries; every appended record
/// receives a new [`RecordId`], even if its content duplicates an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records to the end of the collection, assigning fresh ids.
    ///
    /// Returns the ids assigned, in order.
    pub fn append(&mut self, records: impl IntoIterator<Item = T>) -> Vec<RecordId> {
        let start = self.entries.len();
        self.entries
            .extend(records.into_iter().map(|record| Entry {
                id: RecordId::generate(),
                record,
            }));
        self.entries[start..].iter().map(|e| e.id).collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Entry<T>> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    /// Iterates over the records without their ids.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }
}

impl<T: DeserializeOwned> Collection<T> {
    /// Loads a collection from a JSON file.
    ///
    /// A missing file yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// entries.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_collection".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            Error::InvalidInput(format!("{} is not a valid collection: {e}", path.display()))
        })
    }
}

impl<T: Serialize> Collection<T> {
    /// Saves the collection as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::OperationFailed {
            operation: "serialize_collection".to_string(),
            cause: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| Error::OperationFailed {
            operation: "write_collection".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a Entry<T>;
    type IntoIter = std::slice::Iter<'a, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Task};

    #[test]
    fn test_append_assigns_fresh_ids() {
        let mut tasks = Collection::new();
        let first = tasks.append([Task::new("A", "a")]);
        let second = tasks.append([Task::new("A", "a")]);

        assert_eq!(tasks.len(), 2);
        assert_ne!(first[0], second[0]);
        assert_eq!(first[0].as_uuid().get_version_num(), 4);
        assert_eq!(first[0].to_string(), first[0].as_uuid().to_string());
        assert_eq!(tasks.get(first[0]).map(|e| e.record.task.as_str()), Some("A"));
    }

    #[test]
    fn test_append_preserves_existing_entries() {
        let mut tasks = Collection::new();
        tasks.append([Task::new("A", "a")]);
        let before: Vec<_> = tasks.iter().cloned().collect();

        tasks.append([Task::new("B", "b"), Task::new("C", "c")]);

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.iter().next(), before.first());
        let titles: Vec<_> = tasks.records().map(|t| t.task.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.json");

        let mut members = Collection::new();
        members.append([Member::person("John", "Doe"), Member::entity("Acme", true)]);
        members.save(&path).unwrap();

        let loaded: Collection<Member> = Collection::load(&path).unwrap();
        assert_eq!(loaded, members);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Collection<Task> = Collection::load(&dir.path().join("none.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let result: Result<Collection<Task>> = Collection::load(&path);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
