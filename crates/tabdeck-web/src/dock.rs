#![forbid(unsafe_code)]

//! The dock: a single row showing the visible prefix of the collection.
//!
//! Reordering splices inside the prefix. Dropping an icon on the switcher
//! demotes it to the end of the overflow and shrinks the prefix by one.

use std::marker::PhantomData;

use tabdeck_core::{Instant, PointerEvent};
use tabdeck_layout::{CollectionEdit, GeometryProvider, Region};
use tabdeck_runtime::{CollectionSetter, VisibleCount};

use crate::config::ReorderConfig;
use crate::controller::{ClickDecision, Dispatch, ReorderController, Settlement};
use crate::machine::{DragMachineError, DragPhase};
use crate::settle::apply_edit;
use crate::visual::{ItemVisual, magnification};

/// Dock reorder surface over a collection owned elsewhere.
pub struct DockReorder<T, S, G> {
    controller: ReorderController<G>,
    items: S,
    visible: VisibleCount,
    hovered: Option<usize>,
    _item: PhantomData<fn() -> T>,
}

impl<T, S, G> std::fmt::Debug for DockReorder<T, S, G>
where
    G: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockReorder")
            .field("controller", &self.controller)
            .field("visible", &self.visible.get())
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl<T, S, G> DockReorder<T, S, G>
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
        let len = visible.clamp_to_len(items.len());
        Ok(Self {
            controller: ReorderController::new(config, geometry, len)?,
            items,
            visible,
            hovered: None,
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

    /// Number of icons the dock shows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.get()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pointer_down(&mut self, index: usize, event: PointerEvent, now: Instant) -> Dispatch {
        self.sync_len();
        let dispatch = self.controller.pointer_down(index, event, now);
        self.settle(dispatch)
    }

    pub fn pointer_move(&mut self, event: PointerEvent, now: Instant) -> Dispatch {
        let dispatch = self.controller.pointer_move(event, now);
        self.settle(dispatch)
    }

    pub fn pointer_up(&mut self, event: PointerEvent, now: Instant) -> Dispatch {
        let dispatch = self.controller.pointer_up(event, now);
        self.settle(dispatch)
    }

    pub fn blur(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.blur(now);
        self.settle(dispatch)
    }

    pub fn visibility_change(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.visibility_change(now);
        self.settle(dispatch)
    }

    pub fn context_menu(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.context_menu(now);
        self.settle(dispatch)
    }

    pub fn tick(&mut self, now: Instant) -> Dispatch {
        let dispatch = self.controller.tick(now);
        self.settle(dispatch)
    }

    pub fn animation_frame(&mut self) -> Dispatch {
        self.controller.animation_frame()
    }

    pub fn click(&mut self, index: usize, now: Instant) -> ClickDecision {
        self.controller.click(index, now)
    }

    /// Release the dock. A reorder still sliding into place is applied.
    pub fn teardown(&mut self, now: Instant) -> Dispatch {
        self.hovered = None;
        let dispatch = self.controller.teardown(now);
        self.settle(dispatch)
    }

    /// Delete the item at `index` (context menu "remove").
    pub fn remove_item(&mut self, index: usize) -> bool {
        let removed =
            apply_edit::<T, S>(&self.items, &self.visible, CollectionEdit::Remove { index });
        self.sync_len();
        removed
    }

    /// Record which icon the pointer hovers, for magnification.
    pub fn hover(&mut self, index: Option<usize>) {
        self.hovered = index;
    }

    /// Hover magnification of icon `index`.
    #[must_use]
    pub fn hover_scale(&self, index: usize) -> f32 {
        magnification(
            index,
            self.hovered,
            self.controller.phase() != DragPhase::Idle,
        )
    }

    /// Whether the switcher should show its drop highlight.
    #[must_use]
    pub fn switcher_highlighted(&self) -> bool {
        self.controller.drag_region() == Some(Region::DropZone)
    }

    #[must_use]
    pub fn item_visual(&self, index: usize) -> ItemVisual {
        self.controller.item_visual(index)
    }

    fn settle(&mut self, dispatch: Dispatch) -> Dispatch {
        match dispatch.settled {
            Some(Settlement::Reorder { from, to }) => {
                apply_edit::<T, S>(&self.items, &self.visible, CollectionEdit::Move { from, to });
            }
            Some(Settlement::Transfer {
                index,
                region: Region::DropZone,
            }) => {
                if apply_edit::<T, S>(&self.items, &self.visible, CollectionEdit::Demote { index }) {
                    tracing::info!(index, visible = self.visible.get(), "dock item demoted");
                }
            }
            Some(Settlement::Transfer { index, region }) => {
                tracing::debug!(index, ?region, "dock drop outside switcher ignored");
            }
            None => return dispatch,
        }
        self.sync_len();
        dispatch
    }

    fn sync_len(&mut self) {
        let len = self.visible.clamp_to_len(self.items.len());
        self.controller.set_len(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tabdeck_core::{Point, PointerButton, PointerButtons, Rect, Size};
    use tabdeck_layout::{StaticGeometry, SurfaceGeometry};
    use tabdeck_runtime::{Observable, PolicyConfig};

    type Dock = DockReorder<&'static str, Observable<Vec<&'static str>>, StaticGeometry>;

    fn dock(visible: usize) -> Dock {
        let items = Observable::new(vec!["A", "B", "C", "D", "E", "F", "G"]);
        let geometry =
            SurfaceGeometry::new(Rect::new(0.0, 0.0, 270.0, 48.0), Size::new(1280.0, 800.0))
                .with_drop_zone(Rect::new(300.0, 0.0, 48.0, 48.0));
        DockReorder::new(
            ReorderConfig::dock(&PolicyConfig::default()),
            StaticGeometry::new(geometry),
            items,
            VisibleCount::new(visible, 7, 8),
        )
        .unwrap()
    }

    fn at(x: f32) -> PointerEvent {
        PointerEvent::mouse(1, PointerButton::Primary, Point::new(x, 24.0))
    }

    #[test]
    fn switcher_drop_demotes() {
        let mut dock = dock(5);
        let t0 = Instant::now();
        dock.pointer_down(2, at(118.0), t0);
        dock.tick(t0 + Duration::from_millis(500));
        dock.pointer_move(at(320.0), t0 + Duration::from_millis(520));
        assert!(dock.switcher_highlighted());
        let release = dock.pointer_up(
            at(320.0).with_buttons(PointerButtons::empty()),
            t0 + Duration::from_millis(540),
        );
        assert!(matches!(release.settled, Some(Settlement::Transfer { index: 2, .. })));
        assert_eq!(dock.items().get(), vec!["A", "B", "D", "E", "F", "G", "C"]);
        assert_eq!(dock.len(), 4);
        assert!(!dock.switcher_highlighted());
        assert_eq!(dock.controller().len(), 4);
    }

    #[test]
    fn hover_scale_pauses_while_dragging() {
        let mut dock = dock(5);
        dock.hover(Some(1));
        assert_eq!(dock.hover_scale(1), 1.3);
        assert_eq!(dock.hover_scale(3), 1.05);
        let t0 = Instant::now();
        dock.pointer_down(1, at(64.0), t0);
        assert_eq!(dock.hover_scale(1), 1.0);
    }

    #[test]
    fn removing_visible_item_shrinks_prefix() {
        let mut dock = dock(3);
        assert!(dock.remove_item(0));
        assert_eq!(dock.len(), 2);
        assert_eq!(dock.items().get()[0], "B");
        assert!(!dock.remove_item(40));
    }
}
