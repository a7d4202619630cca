#![forbid(unsafe_code)]

//! Settled collection edits.
//!
//! A [`CollectionEdit`] is the only way a drag session changes a collection.
//! Edits are plain data so they can be logged and replayed, and
//! [`CollectionEdit::apply`] is a pure function from the previous sequence to
//! the next one.
//!
//! The dock shows the first `visible` items of the shared collection (the
//! visible prefix); the remainder is the overflow.

use serde::{Deserialize, Serialize};

/// Move the item at `from` so it ends up at `to` (remove, then insert).
///
/// Returns `false` and leaves `items` untouched when either index is out of
/// range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// Clamp a stored visible count to the collection and the dock capacity.
#[must_use]
pub fn clamp_visible_count(stored: usize, len: usize, cap: usize) -> usize {
    stored.min(len).min(cap)
}

/// A settled change to a collection and, for transfers, to its visible count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum CollectionEdit {
    /// Reorder within one surface.
    Move { from: usize, to: usize },
    /// Move a visible item to the end of the overflow and shrink the prefix.
    Demote { index: usize },
    /// Move an overflow item to the end of the visible prefix and grow it.
    Promote { index: usize },
    /// Delete an item, shrinking the prefix when it was visible.
    Remove { index: usize },
}

impl CollectionEdit {
    /// Whether applying this edit to a collection of `len` items with
    /// `visible` shown in the dock changes anything.
    #[must_use]
    pub fn is_noop(&self, len: usize, visible: usize) -> bool {
        match *self {
            Self::Move { from, to } => from == to || from >= len || to >= len,
            Self::Demote { index } => index >= visible.min(len),
            Self::Promote { index } => index < visible || index >= len,
            Self::Remove { index } => index >= len,
        }
    }

    /// Next collection. Out-of-range edits return an unchanged copy.
    #[must_use]
    pub fn apply<T: Clone>(&self, prev: &[T], visible: usize) -> Vec<T> {
        let mut next = prev.to_vec();
        match *self {
            Self::Move { from, to } => {
                move_item(&mut next, from, to);
            }
            Self::Demote { index } => {
                if index < visible.min(next.len()) {
                    let last = next.len() - 1;
                    move_item(&mut next, index, last);
                }
            }
            Self::Promote { index } => {
                if index >= visible && index < next.len() {
                    let to = visible.min(next.len() - 1);
                    move_item(&mut next, index, to);
                }
            }
            Self::Remove { index } => {
                if index < next.len() {
                    next.remove(index);
                }
            }
        }
        next
    }

    /// Visible count after this edit, for a collection of `len` items
    /// before the edit.
    #[must_use]
    pub fn visible_after(&self, len: usize, visible: usize, cap: usize) -> usize {
        let visible = clamp_visible_count(visible, len, cap);
        if self.is_noop(len, visible) {
            return visible;
        }
        match *self {
            Self::Move { .. } => visible,
            Self::Demote { .. } => visible.saturating_sub(1),
            Self::Promote { .. } => (visible + 1).min(cap),
            Self::Remove { index } => {
                if index < visible {
                    visible - 1
                } else {
                    visible
                }
            }
        }
    }
}
