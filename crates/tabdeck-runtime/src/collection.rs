#![forbid(unsafe_code)]

//! The collection owner's setter contract.
//!
//! Drag controllers never own a collection. They hand the owner a
//! [`CollectionUpdate`], either a full replacement or a function from the
//! previous sequence to the next, and the owner decides how to store it.

use std::fmt;

use tabdeck_layout::CollectionEdit;

use crate::item::ItemId;
use crate::observable::Observable;
use crate::storage::StorageError;

/// Why a stored or supplied collection was rejected.
#[derive(Debug)]
pub enum CollectionError {
    /// Two items share an identifier.
    DuplicateId(ItemId),
    /// The stored document is not a list of items.
    Malformed(serde_json::Error),
    /// The backend failed.
    Storage(StorageError),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate item id: {id}"),
            Self::Malformed(e) => write!(f, "malformed collection: {e}"),
            Self::Storage(e) => write!(f, "collection storage: {e}"),
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DuplicateId(_) => None,
            Self::Malformed(e) => Some(e),
            Self::Storage(e) => Some(e),
        }
    }
}

impl From<StorageError> for CollectionError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// A proposed change to an owned sequence.
pub enum CollectionUpdate<T> {
    Replace(Vec<T>),
    Apply(Box<dyn FnOnce(&[T]) -> Vec<T>>),
}

impl<T> CollectionUpdate<T> {
    /// Resolve against the current sequence.
    pub fn resolve(self, prev: &[T]) -> Vec<T> {
        match self {
            Self::Replace(next) => next,
            Self::Apply(f) => f(prev),
        }
    }
}

impl<T: Clone + 'static> CollectionUpdate<T> {
    /// Functional update that applies `edit` with `visible` items in the
    /// dock prefix.
    #[must_use]
    pub fn from_edit(edit: CollectionEdit, visible: usize) -> Self {
        Self::Apply(Box::new(move |prev| edit.apply(prev, visible)))
    }
}

impl<T> fmt::Debug for CollectionUpdate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(next) => f.debug_tuple("Replace").field(&next.len()).finish(),
            Self::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

/// Anything that accepts collection updates.
pub trait CollectionSetter<T> {
    fn set(&self, update: CollectionUpdate<T>);

    /// Current length, used to clamp the visible count after an update.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + PartialEq + 'static> CollectionSetter<T> for Observable<Vec<T>> {
    fn set(&self, update: CollectionUpdate<T>) {
        let next = self.with(|prev| update.resolve(prev));
        Observable::set(self, next);
    }

    fn len(&self) -> usize {
        self.with(Vec::len)
    }
}
