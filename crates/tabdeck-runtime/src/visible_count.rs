#![forbid(unsafe_code)]

//! Shared dock visible count.
//!
//! [`VisibleCount`] is the one owner of N, the length of the dock's visible
//! prefix. The dock and the picker both hold a clone of the same handle;
//! every change is clamped, broadcast to subscribers, and persisted.

use tabdeck_layout::clamp_visible_count;

use crate::observable::{Observable, Subscription};
use crate::persist::LayoutStore;

/// Default cap on the number of items the dock shows.
pub const DEFAULT_VISIBLE_CAP: usize = 8;

/// Observable, persisted visible-prefix length.
///
/// Cloning yields another handle to the same count.
#[derive(Debug, Clone)]
pub struct VisibleCount {
    value: Observable<usize>,
    cap: usize,
    store: Option<LayoutStore>,
}

impl VisibleCount {
    /// In-memory count, clamped to `[0, min(len, cap)]`.
    #[must_use]
    pub fn new(initial: usize, len: usize, cap: usize) -> Self {
        Self {
            value: Observable::new(clamp_visible_count(initial, len, cap)),
            cap,
            store: None,
        }
    }

    /// Count read from `store`, written back on every change.
    #[must_use]
    pub fn load(store: LayoutStore, len: usize, cap: usize) -> Self {
        let initial = store.load_visible_count(len, cap);
        tracing::debug!(initial, len, cap, "visible count loaded");
        Self {
            value: Observable::new(initial),
            cap,
            store: Some(store),
        }
    }

    #[must_use]
    pub fn get(&self) -> usize {
        self.value.get()
    }

    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Store `count` clamped against a collection of `len` items.
    ///
    /// Returns the value actually stored.
    pub fn set(&self, count: usize, len: usize) -> usize {
        let clamped = clamp_visible_count(count, len, self.cap);
        if self.value.set(clamped) {
            self.persist(clamped);
        }
        clamped
    }

    /// Re-clamp after the collection length changed.
    pub fn clamp_to_len(&self, len: usize) -> usize {
        self.set(self.get(), len)
    }

    pub fn subscribe(&self, callback: impl Fn(&usize) + 'static) -> Subscription {
        self.value.subscribe(callback)
    }

    /// Underlying observable, for hosts that bind it directly.
    #[must_use]
    pub fn observable(&self) -> &Observable<usize> {
        &self.value
    }

    fn persist(&self, count: usize) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save_visible_count(count) {
            tracing::warn!(count, error = %err, "failed to persist visible count");
        }
    }
}
