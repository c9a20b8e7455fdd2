//! Read-only record collections.

use std::fmt;
use std::sync::Arc;

/// A record identified by an integer id that is unique within its collection.
pub trait Record {
    /// Returns the record identifier.
    fn id(&self) -> u32;
}

/// Immutable, cheaply cloneable sequence of records.
///
/// Clones share the same backing allocation, so a collection can be handed to
/// every concurrent request without copying or locking. There is no mutation
/// path once the collection is built.
pub struct Collection<T> {
    records: Arc<[T]>,
}

impl<T: Record> Collection<T> {
    /// Creates a collection from the given records, keeping their order.
    pub fn new(records: impl Into<Arc<[T]>>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Returns all records in their original order.
    #[inline]
    pub fn all(&self) -> &[T] {
        &self.records
    }

    /// Returns the record with the given id, if present.
    pub fn find_by_id(&self, id: u32) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Returns the records matching `predicate`, in their original order.
    ///
    /// No match yields an empty vector.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.records
            .iter()
            .filter(|&record| predicate(record))
            .collect()
    }

    /// Returns the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the collection holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.records.iter()).finish()
    }
}
