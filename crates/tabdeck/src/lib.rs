#![forbid(unsafe_code)]

//! tabdeck public facade crate.
//!
//! This crate provides the stable surface area for start-page hosts. It
//! re-exports the common types from the internal crates, mounts the dock and
//! picker over one shared collection with [`Deck`], and offers a prelude.

use std::fmt;

use tabdeck_layout::GeometryProvider;

// --- Core re-exports -------------------------------------------------------

pub use tabdeck_core::{
    CubicBezier, Instant, Offset, Point, PointerButton, PointerButtons, PointerEvent,
    PointerKind, Rect, Size,
};

#[cfg(feature = "tracing-json")]
pub use tabdeck_core::logging::{SubscriberInitError, init_json_subscriber};

// --- Layout re-exports -----------------------------------------------------

pub use tabdeck_layout::{
    Breakpoint, Breakpoints, CollectionEdit, DropRule, FnGeometry, Region, Responsive,
    SlotLayout, StaticGeometry, SurfaceGeometry,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tabdeck_runtime::{
    CollectionError, CollectionSetter, CollectionUpdate, FileStorage, Item, ItemId, LayoutStore,
    MemoryStorage, Observable, PersistedItems, PolicyConfig, PolicyConfigError, StorageBackend,
    StorageError, Subscription, VisibleCount,
};

// --- Web re-exports --------------------------------------------------------

pub use tabdeck_web::{
    ClickDecision, Dispatch, DockReorder, DragMachineError, DragPhase, HostCommand, ItemVisual,
    PickerHint, PickerReorder, ReorderConfig, ReorderController, Settlement, TransitionSpec,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tabdeck hosts.
#[derive(Debug)]
pub enum Error {
    /// Policy file unreadable or invalid.
    Config(PolicyConfigError),
    /// Supplied collection rejected.
    Collection(CollectionError),
    /// Storage backend failure.
    Storage(StorageError),
    /// Controller thresholds unusable.
    Drag(DragMachineError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Collection(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Drag(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Collection(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Drag(err) => Some(err),
        }
    }
}

impl From<PolicyConfigError> for Error {
    fn from(err: PolicyConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<CollectionError> for Error {
    fn from(err: CollectionError) -> Self {
        Self::Collection(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<DragMachineError> for Error {
    fn from(err: DragMachineError) -> Self {
        Self::Drag(err)
    }
}

/// Standard result type for tabdeck APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Deck -----------------------------------------------------------------

/// Dock and picker mounted over one persisted collection and one visible
/// count.
pub struct Deck<DG, PG> {
    items: PersistedItems,
    visible: VisibleCount,
    dock: DockReorder<Item, PersistedItems, DG>,
    picker: PickerReorder<Item, PersistedItems, PG>,
}

impl<DG, PG> fmt::Debug for Deck<DG, PG> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deck")
            .field("items", &self.items.with(<[Item]>::len))
            .field("visible", &self.visible.get())
            .finish_non_exhaustive()
    }
}

impl<DG, PG> Deck<DG, PG>
where
    DG: GeometryProvider,
    PG: GeometryProvider,
{
    /// Read the stored layout (falling back to `defaults`) and build both
    /// surfaces with `policy`.
    pub fn mount(
        store: LayoutStore,
        defaults: &[Item],
        policy: &PolicyConfig,
        dock_geometry: DG,
        picker_geometry: PG,
    ) -> Result<Self> {
        let problems = policy.validate();
        if !problems.is_empty() {
            return Err(PolicyConfigError::Validation(problems).into());
        }
        tabdeck_runtime::validate_unique_ids(defaults)?;

        let items = PersistedItems::load(store.clone(), defaults);
        let visible = VisibleCount::load(
            store,
            CollectionSetter::len(&items),
            policy.dock.max_visible,
        );
        let dock = DockReorder::new(
            ReorderConfig::dock(policy),
            dock_geometry,
            items.clone(),
            visible.clone(),
        )?;
        let picker = PickerReorder::new(
            ReorderConfig::picker(policy),
            picker_geometry,
            items.clone(),
            visible.clone(),
        )?;
        tracing::info!(
            items = CollectionSetter::len(&items),
            visible = visible.get(),
            "deck mounted"
        );
        Ok(Self {
            items,
            visible,
            dock,
            picker,
        })
    }

    #[must_use]
    pub fn items(&self) -> &PersistedItems {
        &self.items
    }

    #[must_use]
    pub fn visible_count(&self) -> &VisibleCount {
        &self.visible
    }

    /// Items currently shown in the dock.
    #[must_use]
    pub fn dock_items(&self) -> Vec<Item> {
        let n = self.visible.get();
        self.items.with(|items| items.iter().take(n).cloned().collect())
    }

    #[must_use]
    pub fn dock(&self) -> &DockReorder<Item, PersistedItems, DG> {
        &self.dock
    }

    pub fn dock_mut(&mut self) -> &mut DockReorder<Item, PersistedItems, DG> {
        &mut self.dock
    }

    #[must_use]
    pub fn picker(&self) -> &PickerReorder<Item, PersistedItems, PG> {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut PickerReorder<Item, PersistedItems, PG> {
        &mut self.picker
    }

    /// Tear down both surfaces. Gestures in flight are cancelled; a reorder
    /// still sliding into place is applied first.
    pub fn unmount(&mut self, now: Instant) -> Vec<Dispatch> {
        vec![self.dock.teardown(now), self.picker.close(now)]
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ClickDecision, Deck, Dispatch, Error, HostCommand, Instant, Item, LayoutStore, Point,
        PointerEvent, PolicyConfig, Result, Settlement, StaticGeometry, SurfaceGeometry,
    };

    pub use crate::{core, layout, runtime, web};
}

pub use tabdeck_core as core;
pub use tabdeck_layout as layout;
pub use tabdeck_runtime as runtime;
pub use tabdeck_web as web;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use std::time::Duration;

    fn defaults() -> Vec<Item> {
        ["Mail", "Maps", "News", "Docs", "Chat"]
            .iter()
            .map(|name| {
                Item::new(
                    name.to_lowercase(),
                    *name,
                    format!("{}.example.com", name.to_lowercase()),
                    "",
                )
            })
            .collect()
    }

    fn geometry() -> StaticGeometry {
        StaticGeometry::new(
            SurfaceGeometry::new(Rect::new(0.0, 0.0, 270.0, 48.0), Size::new(1280.0, 800.0))
                .with_drop_zone(Rect::new(300.0, 0.0, 48.0, 48.0)),
        )
    }

    #[test]
    fn mount_rejects_invalid_policy() {
        let mut policy = PolicyConfig::default();
        policy.dock.max_visible = 0;
        let store = LayoutStore::new(Rc::new(MemoryStorage::new()));
        let err = Deck::mount(store, &defaults(), &policy, geometry(), geometry()).unwrap_err();
        assert!(matches!(err, Error::Config(PolicyConfigError::Validation(_))));
    }

    #[test]
    fn mount_rejects_duplicate_defaults() {
        let mut items = defaults();
        items.push(items[0].clone());
        let store = LayoutStore::new(Rc::new(MemoryStorage::new()));
        let err = Deck::mount(store, &items, &PolicyConfig::default(), geometry(), geometry())
            .unwrap_err();
        assert!(matches!(err, Error::Collection(CollectionError::DuplicateId(_))));
        assert_eq!(err.to_string(), "duplicate item id: mail");
    }

    #[test]
    fn dock_demotion_survives_remount() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let policy = PolicyConfig::default();
        let store = LayoutStore::new(Rc::new(FileStorage::new(&path)));
        let mut deck = Deck::mount(store, &defaults(), &policy, geometry(), geometry()).unwrap();
        assert_eq!(deck.dock_items().len(), 5);

        let t0 = Instant::now();
        let press = PointerEvent::mouse(1, PointerButton::Primary, Point::new(10.0, 24.0));
        deck.dock_mut().pointer_down(0, press, t0);
        deck.dock_mut().tick(t0 + Duration::from_millis(500));
        let over = PointerEvent::mouse(1, PointerButton::Primary, Point::new(320.0, 24.0));
        deck.dock_mut().pointer_move(over, t0 + Duration::from_millis(520));
        deck.dock_mut().pointer_up(
            over.with_buttons(PointerButtons::empty()),
            t0 + Duration::from_millis(540),
        );
        assert_eq!(deck.visible_count().get(), 4);
        assert!(deck.unmount(t0).iter().all(|d| d.settled.is_none()));

        let store = LayoutStore::new(Rc::new(FileStorage::new(&path)));
        let deck = Deck::mount(store, &defaults(), &policy, geometry(), geometry()).unwrap();
        let names: Vec<String> = deck.dock_items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Maps", "News", "Docs", "Chat"]);
        assert_eq!(deck.items().with(|items| items[4].name.clone()), "Mail");
    }

    #[test]
    fn unmount_mid_slide_persists_reorder() {
        let store = LayoutStore::new(Rc::new(MemoryStorage::new()));
        let mut deck = Deck::mount(
            store.clone(),
            &defaults(),
            &PolicyConfig::default(),
            geometry(),
            geometry(),
        )
        .unwrap();
        let t0 = Instant::now();
        let press = PointerEvent::mouse(1, PointerButton::Primary, Point::new(10.0, 24.0));
        deck.dock_mut().pointer_down(0, press, t0);
        deck.dock_mut().tick(t0 + Duration::from_millis(500));
        let over = PointerEvent::mouse(1, PointerButton::Primary, Point::new(172.0, 24.0));
        deck.dock_mut().pointer_move(over, t0 + Duration::from_millis(500));
        deck.dock_mut().pointer_up(
            over.with_buttons(PointerButtons::empty()),
            t0 + Duration::from_millis(500),
        );

        let dispatches = deck.unmount(t0 + Duration::from_millis(600));
        assert_eq!(
            dispatches[0].settled,
            Some(Settlement::Reorder { from: 0, to: 3 })
        );
        let names: Vec<String> = store.load_items(&[]).into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Maps", "News", "Docs", "Mail", "Chat"]);
    }
}
