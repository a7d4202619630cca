#![forbid(unsafe_code)]

//! The app picker: a responsive grid over the whole collection.
//!
//! Reordering splices the full collection. Dragging an icon off the dialog
//! (or into the band above the viewport bottom) promotes it into the dock
//! when it is not already there, and closes the picker either way.

use std::marker::PhantomData;

use tabdeck_core::{Instant, PointerEvent};
use tabdeck_layout::{CollectionEdit, GeometryProvider, Region};
use tabdeck_runtime::{CollectionSetter, VisibleCount};

use crate::config::ReorderConfig;
use crate::controller::{ClickDecision, Dispatch, HostCommand, ReorderController, Settlement};
use crate::machine::{DragMachineError, DragSession};
use crate::settle::apply_edit;
use crate::visual::ItemVisual;

/// Banner shown while an icon is held outside the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerHint {
    /// The icon is inside the dock prefix; dropping only closes the picker.
    AlreadyInDock,
    /// Dropping adds the icon to the end of the dock.
    WillAdd,
    /// The dock is at capacity; the icon moves to the head of the overflow.
    DockFull,
}

/// Picker reorder surface over a collection owned elsewhere.
pub struct PickerReorder<T, S, G> {
    controller: ReorderController<G>,
    items: S,
    visible: VisibleCount,
    _item: PhantomData<fn() -> T>,
}

impl<T, S, G> std::fmt::Debug for PickerReorder<T, S, G>
where
    G: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerReorder")
            .field("controller", &self.controller)
            .field("visible", &self.visible.get())
            .finish_non_exhaustive()
    }
}

impl<T, S, G> PickerReorder<T, S, G>
where
    T: Clone + 'static,
    S: CollectionSetter<T>,
    G: GeometryProvider,
{
    pub fn new(
        config: ReorderConfig,
        geometry: G,
        items: S,
        visible: VisibleCount,
    ) -> Result<Self, DragMachineError> {
        let len = items.len();
        Ok(Self {
            controller: ReorderController::new(config, geometry, len)?,
            items,
            visible,
            _item: PhantomData,
        })
    }

    #[must_use]
    pub const fn controller(&self) -> &ReorderController<G> {
        &self.controller
    }

    #[must_use]
    pub const fn items(&self) -> &S {
        &self.items
    }

    #[must_use]
    pub const fn visible_count(&self) -> &VisibleCount {
        &self.visible
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.surface_open()
    }

    /// Open the picker and take a first measurement.
    pub fn open(&mut self, now: Instant) {
        self.controller.set_len(self.items.len());
        self.controller.set_surface_open(true, now);
        tracing::debug!(items = self.items.len(), "picker opened");
    }

    /// Close the picker. A gesture in flight is cancelled, but a reorder
    /// still sliding into place is applied.
    pub fn close(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.teardown(now);
        tracing::debug!("picker closed");
        self.settle(dispatch, now)
    }

    pub fn pointer_down(&mut self, index: usize, event: PointerEvent, now: Instant) -> Dispatch {
        self.controller.set_len(self.items.len());
        let dispatch = self.controller.pointer_down(index, event, now);
        self.settle(dispatch, now)
    }

    pub fn pointer_move(&mut self, event: PointerEvent, now: Instant) -> Dispatch {
        let dispatch = self.controller.pointer_move(event, now);
        self.settle(dispatch, now)
    }

    pub fn pointer_up(&mut self, event: PointerEvent, now: Instant) -> Dispatch {
        let dispatch = self.controller.pointer_up(event, now);
        self.settle(dispatch, now)
    }

    pub fn blur(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.blur(now);
        self.settle(dispatch, now)
    }

    pub fn visibility_change(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.visibility_change(now);
        self.settle(dispatch, now)
    }

    pub fn context_menu(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.context_menu(now);
        self.settle(dispatch, now)
    }

    pub fn tick(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.tick(now);
        self.settle(dispatch, now)
    }

    pub fn animation_frame(&mut self) -> Dispatch {
        self.controller.animation_frame()
    }

    pub fn click(&mut self, index: usize, now: Instant) -> ClickDecision {
        self.controller.click(index, now)
    }

    /// Delete the item at `index` (context menu "remove").
    pub fn remove_item(&mut self, index: usize) -> bool {
        let removed =
            apply_edit::<T, S>(&self.items, &self.visible, CollectionEdit::Remove { index });
        self.controller.set_len(self.items.len());
        removed
    }

    /// Banner for the held icon, while it is outside the picker.
    #[must_use]
    pub fn hint(&self) -> Option<PickerHint> {
        let DragSession::Dragging {
            origin,
            region: Region::Outside,
            ..
        } = self.controller.machine_state()
        else {
            return None;
        };
        let visible = self.visible.get();
        Some(if origin < visible {
            PickerHint::AlreadyInDock
        } else if visible >= self.visible.cap() {
            PickerHint::DockFull
        } else {
            PickerHint::WillAdd
        })
    }

    #[must_use]
    pub fn item_visual(&self, index: usize) -> ItemVisual {
        self.controller.item_visual(index)
    }

    fn settle(&mut self, mut dispatch: Dispatch, now: Instant) -> Dispatch {
        match dispatch.settled {
            Some(Settlement::Reorder { from, to }) => {
                apply_edit::<T, S>(&self.items, &self.visible, CollectionEdit::Move { from, to });
            }
            Some(Settlement::Transfer { index, .. }) => {
                if apply_edit::<T, S>(&self.items, &self.visible, CollectionEdit::Promote { index })
                {
                    tracing::info!(index, visible = self.visible.get(), "picker item promoted");
                } else {
                    tracing::debug!(index, "picker item already in dock");
                }
                self.controller.set_surface_open(false, now);
                dispatch.commands.push(HostCommand::CloseSurface);
            }
            None => return dispatch,
        }
        self.controller.set_len(self.items.len());
        dispatch
    }
}
