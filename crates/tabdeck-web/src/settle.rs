#![forbid(unsafe_code)]

//! Applying settled gestures to the collection owner.

use tabdeck_layout::CollectionEdit;
use tabdeck_runtime::{CollectionSetter, CollectionUpdate, VisibleCount};

/// Apply `edit` through `items`, then move the shared visible count.
///
/// Returns `false` (and touches nothing) when the edit would not change the
/// collection.
pub fn apply_edit<T, S>(items: &S, visible: &VisibleCount, edit: CollectionEdit) -> bool
where
    T: Clone + 'static,
    S: CollectionSetter<T> + ?Sized,
{
    let len = items.len();
    let current = visible.get();
    if edit.is_noop(len, current) {
        tracing::debug!(?edit, len, visible = current, "settled edit is a no-op");
        return false;
    }
    let next_visible = edit.visible_after(len, current, visible.cap());
    items.set(CollectionUpdate::from_edit(edit, current));
    let stored = visible.set(next_visible, items.len());
    tracing::info!(?edit, visible = stored, "collection edit applied");
    true
}
