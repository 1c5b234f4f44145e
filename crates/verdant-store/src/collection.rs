//! Versioned document collections.
//!
//! A [`Collection`] is one logical table of documents keyed by a typed id.
//! Every document carries a monotonic `version`, bumped on each successful
//! write, and an insertion `seq` that fixes storage order for "first found"
//! semantics. All mutation happens in place under the map's shard lock, so
//! two writers editing different embedded array elements of the same
//! document cannot clobber each other the way load/modify/store would.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// A storable document with a typed primary id.
pub trait Document: Clone + Send + Sync + 'static {
    /// Primary key type.
    type Id: Copy + Eq + Hash + Send + Sync + 'static;

    /// The document's id.
    fn id(&self) -> Self::Id;
}

/// Soft-deletable documents. Tombstoned documents stay addressable through
/// the raw accessors but are treated as absent by the `*_active` family.
pub trait Tombstone {
    /// Whether the document is tombstoned.
    fn is_deleted(&self) -> bool;

    /// Tombstone the document.
    fn mark_deleted(&mut self, at: DateTime<Utc>);
}

/// A document together with its concurrency metadata.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The stored document.
    pub doc: T,
    /// Monotonic write counter, starting at 1 on insert.
    pub version: u64,
    /// Insertion sequence, unique per collection.
    pub seq: u64,
}

/// One concurrent, versioned collection of documents.
#[derive(Debug)]
pub struct Collection<T: Document> {
    docs: DashMap<T::Id, Versioned<T>>,
    next_seq: AtomicU64,
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> Collection<T> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Insert a new document.
    ///
    /// # Errors
    /// `StoreError::AlreadyExists` if the id is taken.
    pub fn insert(&self, doc: T) -> Result<(), StoreError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        match self.docs.entry(doc.id()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Versioned {
                    doc,
                    version: 1,
                    seq,
                });
                Ok(())
            }
        }
    }

    /// Fetch a document clone, tombstoned or not.
    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<T> {
        self.docs.get(&id).map(|v| v.doc.clone())
    }

    /// Fetch a document clone together with its version metadata.
    #[must_use]
    pub fn get_versioned(&self, id: T::Id) -> Option<Versioned<T>> {
        self.docs.get(&id).map(|v| v.clone())
    }

    /// Apply an infallible mutation in place and bump the version.
    ///
    /// Returns the updated document.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the id does not resolve.
    pub fn mutate(&self, id: T::Id, f: impl FnOnce(&mut T)) -> Result<T, StoreError> {
        let mut entry = self.docs.get_mut(&id).ok_or(StoreError::NotFound)?;
        f(&mut entry.doc);
        entry.version += 1;
        Ok(entry.doc.clone())
    }

    /// Apply a fallible mutation atomically: the closure edits a draft, and
    /// the draft replaces the stored document (with a version bump) only if
    /// the closure succeeds. On closure failure nothing is written.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the id does not resolve; otherwise the
    /// closure's own error is passed through in the inner `Result`.
    pub fn try_mutate<R, E>(
        &self,
        id: T::Id,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<Result<R, E>, StoreError> {
        let mut entry = self.docs.get_mut(&id).ok_or(StoreError::NotFound)?;
        let mut draft = entry.doc.clone();
        match f(&mut draft) {
            Ok(out) => {
                entry.doc = draft;
                entry.version += 1;
                Ok(Ok(out))
            }
            Err(e) => Ok(Err(e)),
        }
    }

    /// Replace the document if its version still matches `expected`.
    ///
    /// Returns the new version on success.
    ///
    /// # Errors
    /// `StoreError::NotFound` or `StoreError::VersionConflict`.
    pub fn compare_and_swap(&self, doc: T, expected: u64) -> Result<u64, StoreError> {
        let mut entry = self.docs.get_mut(&doc.id()).ok_or(StoreError::NotFound)?;
        if entry.version != expected {
            return Err(StoreError::VersionConflict {
                expected,
                actual: entry.version,
            });
        }
        entry.doc = doc;
        entry.version += 1;
        Ok(entry.version)
    }

    /// Physically remove a document. Reserved for entities without a
    /// tombstone convention.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the id does not resolve.
    pub fn remove(&self, id: T::Id) -> Result<T, StoreError> {
        self.docs
            .remove(&id)
            .map(|(_, v)| v.doc)
            .ok_or(StoreError::NotFound)
    }

    /// All documents matching a predicate, in insertion order.
    #[must_use]
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut hits: Vec<(u64, T)> = self
            .docs
            .iter()
            .filter(|v| pred(&v.doc))
            .map(|v| (v.seq, v.doc.clone()))
            .collect();
        hits.sort_by_key(|(seq, _)| *seq);
        hits.into_iter().map(|(_, doc)| doc).collect()
    }

    /// Number of documents, tombstoned included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the collection holds no documents at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl<T: Document + Tombstone> Collection<T> {
    /// Fetch a live (non-tombstoned) document clone.
    #[must_use]
    pub fn get_active(&self, id: T::Id) -> Option<T> {
        self.docs
            .get(&id)
            .filter(|v| !v.doc.is_deleted())
            .map(|v| v.doc.clone())
    }

    /// Live documents matching a predicate, in insertion order.
    #[must_use]
    pub fn find_active(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.find(|doc| !doc.is_deleted() && pred(doc))
    }

    /// The earliest-inserted live document matching a predicate.
    #[must_use]
    pub fn first_active(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.find_active(pred).into_iter().next()
    }

    /// Tombstone a live document.
    ///
    /// Returns the tombstoned document. A document that is already
    /// tombstoned counts as absent.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the id does not resolve to a live document.
    pub fn soft_delete(&self, id: T::Id, at: DateTime<Utc>) -> Result<T, StoreError> {
        let mut entry = self.docs.get_mut(&id).ok_or(StoreError::NotFound)?;
        if entry.doc.is_deleted() {
            return Err(StoreError::NotFound);
        }
        entry.doc.mark_deleted(at);
        entry.version += 1;
        Ok(entry.doc.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        body: String,
        tags: Vec<String>,
        is_deleted: bool,
        deleted_at: Option<DateTime<Utc>>,
    }

    impl Note {
        fn new(body: &str) -> Self {
            Self {
                id: Uuid::new_v4(),
                body: body.to_string(),
                tags: Vec::new(),
                is_deleted: false,
                deleted_at: None,
            }
        }
    }

    impl Document for Note {
        type Id = Uuid;

        fn id(&self) -> Uuid {
            self.id
        }
    }

    impl Tombstone for Note {
        fn is_deleted(&self) -> bool {
            self.is_deleted
        }

        fn mark_deleted(&mut self, at: DateTime<Utc>) {
            self.is_deleted = true;
            self.deleted_at = Some(at);
        }
    }

    #[test]
    fn insert_and_get() {
        let notes = Collection::new();
        let note = Note::new("water the basil");
        let id = note.id;
        notes.insert(note.clone()).unwrap();

        assert_eq!(notes.get(id), Some(note.clone()));
        assert_eq!(notes.insert(note), Err(StoreError::AlreadyExists));
    }

    #[test]
    fn mutate_bumps_version() {
        let notes = Collection::new();
        let note = Note::new("a");
        let id = note.id;
        notes.insert(note).unwrap();

        assert_eq!(notes.get_versioned(id).unwrap().version, 1);
        notes.mutate(id, |n| n.body.push('b')).unwrap();
        let v = notes.get_versioned(id).unwrap();
        assert_eq!(v.version, 2);
        assert_eq!(v.doc.body, "ab");
    }

    #[test]
    fn try_mutate_failure_writes_nothing() {
        let notes = Collection::new();
        let note = Note::new("keep");
        let id = note.id;
        notes.insert(note).unwrap();

        let out: Result<Result<(), &str>, StoreError> = notes.try_mutate(id, |n| {
            n.body = "clobbered".to_string();
            Err("validation failed")
        });
        assert_eq!(out.unwrap(), Err("validation failed"));

        let v = notes.get_versioned(id).unwrap();
        assert_eq!(v.doc.body, "keep");
        assert_eq!(v.version, 1);
    }

    #[test]
    fn compare_and_swap_detects_stale_writers() {
        let notes = Collection::new();
        let note = Note::new("v1");
        let id = note.id;
        notes.insert(note).unwrap();

        let read = notes.get_versioned(id).unwrap();
        let mut stale = read.doc.clone();
        stale.body = "stale".to_string();

        // A competing write lands first.
        notes.mutate(id, |n| n.body = "fresh".to_string()).unwrap();

        let err = notes.compare_and_swap(stale, read.version).unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { expected: 1, actual: 2 }));
        assert_eq!(notes.get(id).unwrap().body, "fresh");
    }

    #[test]
    fn soft_delete_hides_from_active_reads() {
        let notes = Collection::new();
        let note = Note::new("gone soon");
        let id = note.id;
        notes.insert(note).unwrap();

        notes.soft_delete(id, Utc::now()).unwrap();
        assert!(notes.get_active(id).is_none());
        assert!(notes.get(id).is_some());
        assert_eq!(notes.soft_delete(id, Utc::now()), Err(StoreError::NotFound));
    }

    #[test]
    fn find_preserves_insertion_order() {
        let notes = Collection::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            let note = Note::new(&format!("n{i}"));
            ids.push(note.id);
            notes.insert(note).unwrap();
        }
        let all = notes.find(|_| true);
        let got: Vec<Uuid> = all.iter().map(|n| n.id).collect();
        assert_eq!(got, ids);
        assert_eq!(
            notes.first_active(|_| true).unwrap().id,
            ids[0],
            "first_active must return the earliest insert"
        );
    }

    #[test]
    fn concurrent_mutations_to_different_array_elements_both_land() {
        let notes = Arc::new(Collection::new());
        let mut note = Note::new("tags");
        note.tags = vec!["a".to_string(), "b".to_string()];
        let id = note.id;
        notes.insert(note).unwrap();

        let mut handles = Vec::new();
        for i in 0..2 {
            let notes = Arc::clone(&notes);
            handles.push(std::thread::spawn(move || {
                notes
                    .mutate(id, |n| n.tags[i] = format!("edited-{i}"))
                    .unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let doc = notes.get(id).unwrap();
        assert_eq!(doc.tags, vec!["edited-0".to_string(), "edited-1".to_string()]);
        assert_eq!(notes.get_versioned(id).unwrap().version, 3);
    }
}
