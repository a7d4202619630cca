#![forbid(unsafe_code)]

//! End-to-end drag lifecycles through the dock and picker surfaces, with a
//! persisted collection and a shared visible count.
//!
//! Run:
//!   cargo test -p tabdeck-web --test drag_lifecycle

use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tabdeck_core::{Instant, Point, PointerButton, PointerButtons, PointerEvent, Rect, Size};
use tabdeck_layout::{StaticGeometry, SurfaceGeometry};
use tabdeck_runtime::{
    Item, LayoutStore, MemoryStorage, PersistedItems, PolicyConfig, VisibleCount,
};
use tabdeck_web::{
    ClickDecision, DispatchOutcome, DockReorder, DragPhase, HostCommand, IgnoredReason,
    PickerReorder, ReorderConfig, Settlement,
};

const HOLD: Duration = Duration::from_millis(500);

type Dock = DockReorder<Item, PersistedItems, Rc<StaticGeometry>>;
type Picker = PickerReorder<Item, PersistedItems, Rc<StaticGeometry>>;

fn letters(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let c = char::from(b'A' + i as u8).to_string();
            Item::new(c.to_lowercase(), c.clone(), format!("{c}.example"), "")
        })
        .collect()
}

fn names(items: &PersistedItems) -> Vec<String> {
    items.with(|v| v.iter().map(|i| i.name.clone()).collect())
}

struct Page {
    store: LayoutStore,
    items: PersistedItems,
    visible: VisibleCount,
    dock: Dock,
    picker: Picker,
}

/// A page with `n` items, `visible` of them in the dock.
///
/// Dock icons sit on a 54 px stride starting at x = 0, the switcher at
/// x = 440. The picker grid is 4 x 100 px columns starting at (50, 50).
fn page(n: usize, visible: usize) -> Page {
    let store = LayoutStore::new(Rc::new(MemoryStorage::new()));
    let items = PersistedItems::load(store.clone(), &letters(n));
    let count = VisibleCount::load(store.clone(), n, 8);
    count.set(visible, n);
    let policy = PolicyConfig::default();
    let dock_geometry = Rc::new(StaticGeometry::new(
        SurfaceGeometry::new(Rect::new(0.0, 700.0, 432.0, 48.0), Size::new(1280.0, 800.0))
            .with_drop_zone(Rect::new(440.0, 700.0, 48.0, 48.0)),
    ));
    let picker_geometry = Rc::new(StaticGeometry::new(
        SurfaceGeometry::new(Rect::new(50.0, 50.0, 400.0, 300.0), Size::new(1280.0, 800.0))
            .with_content(Rect::new(0.0, 0.0, 500.0, 450.0)),
    ));
    Page {
        dock: DockReorder::new(
            ReorderConfig::dock(&policy),
            dock_geometry,
            items.clone(),
            count.clone(),
        )
        .unwrap(),
        picker: PickerReorder::new(
            ReorderConfig::picker(&policy),
            picker_geometry,
            items.clone(),
            count.clone(),
        )
        .unwrap(),
        store,
        items,
        visible: count,
    }
}

fn dock_at(x: f32) -> PointerEvent {
    PointerEvent::mouse(1, PointerButton::Primary, Point::new(x, 724.0))
}

fn lifted(event: PointerEvent) -> PointerEvent {
    event.with_buttons(PointerButtons::empty())
}

fn dock_slot_x(index: usize) -> f32 {
    index as f32 * 54.0 + 20.0
}

#[test]
fn release_at_origin_never_mutates() {
    let mut p = page(5, 5);
    let t0 = Instant::now();
    let x = dock_slot_x(2);
    p.dock.pointer_down(2, dock_at(x), t0);
    p.dock.tick(t0 + HOLD);
    p.dock.pointer_move(dock_at(x + 40.0), t0 + HOLD);
    let up = p.dock.pointer_up(lifted(dock_at(x + 4.0)), t0 + HOLD);
    assert_eq!(up.settled, None);
    assert_eq!(p.dock.controller().phase(), DragPhase::Idle);
    assert_eq!(p.items.observable().version(), 0);
    assert_eq!(p.store.try_load_items().unwrap(), None);
}

#[test]
fn dock_commit_splices_and_persists() {
    let mut p = page(5, 5);
    let t0 = Instant::now();
    let x = dock_slot_x(0);
    p.dock.pointer_down(0, dock_at(x), t0);
    p.dock.tick(t0 + HOLD);
    p.dock.pointer_move(dock_at(x + 162.0), t0 + HOLD);
    let release = t0 + Duration::from_millis(600);
    p.dock.pointer_up(lifted(dock_at(x + 162.0)), release);
    assert_eq!(names(&p.items), ["A", "B", "C", "D", "E"]);

    let commit = p.dock.tick(release + Duration::from_millis(350));
    assert_eq!(commit.settled, Some(Settlement::Reorder { from: 0, to: 3 }));
    assert_eq!(names(&p.items), ["B", "C", "D", "A", "E"]);
    assert_eq!(p.store.load_items(&[]), p.items.get());
    assert_eq!(p.visible.get(), 5);
}

#[test]
fn cancel_restores_and_releases_listeners() {
    let mut p = page(5, 5);
    let t0 = Instant::now();
    let x = dock_slot_x(1);
    p.dock.pointer_down(1, dock_at(x), t0);
    p.dock.tick(t0 + HOLD);
    p.dock.pointer_move(dock_at(x + 120.0), t0 + HOLD);
    let blur = p.dock.blur(t0 + HOLD);
    assert!(blur.has_command(HostCommand::DetachGlobalListeners));
    assert!(!p.dock.controller().listeners_attached());

    let next = p.dock.pointer_move(dock_at(x + 200.0), t0 + HOLD);
    assert_eq!(
        next.log.outcome,
        DispatchOutcome::Ignored(IgnoredReason::NoActiveSession)
    );
    assert!(p.dock.tick(t0 + Duration::from_secs(2)).settled.is_none());
    assert_eq!(p.items.observable().version(), 0);
}

#[test]
fn moved_gestures_suppress_clicks_and_taps_navigate() {
    let mut p = page(5, 5);
    let t0 = Instant::now();
    let x = dock_slot_x(3);

    p.dock.pointer_down(3, dock_at(x), t0);
    p.dock.pointer_up(lifted(dock_at(x + 2.0)), t0 + Duration::from_millis(120));
    assert_eq!(
        p.dock.click(3, t0 + Duration::from_millis(121)),
        ClickDecision::Navigate(3)
    );

    let t1 = t0 + Duration::from_secs(1);
    p.dock.pointer_down(3, dock_at(x), t1);
    p.dock.tick(t1 + HOLD);
    p.dock.pointer_move(dock_at(x + 6.0), t1 + HOLD);
    let up_at = t1 + Duration::from_millis(700);
    p.dock.pointer_up(lifted(dock_at(x + 6.0)), up_at);
    assert_eq!(p.dock.click(3, up_at), ClickDecision::Suppressed);
    assert_eq!(
        p.dock.click(3, up_at + Duration::from_millis(100)),
        ClickDecision::Navigate(3)
    );
}

#[test]
fn switcher_demotes_and_picker_promotes_back() {
    let mut p = page(9, 5);
    let t0 = Instant::now();
    let x = dock_slot_x(2);
    p.dock.pointer_down(2, dock_at(x), t0);
    p.dock.tick(t0 + HOLD);
    p.dock.pointer_move(dock_at(460.0), t0 + HOLD);
    assert!(p.dock.switcher_highlighted());
    p.dock.pointer_up(lifted(dock_at(460.0)), t0 + HOLD);
    assert_eq!(names(&p.items), ["A", "B", "D", "E", "F", "G", "H", "I", "C"]);
    assert_eq!(p.visible.get(), 4);
    assert_eq!(p.dock.len(), 4);

    // "C" is now the last picker cell: index 8, row 2, column 0.
    let t1 = t0 + Duration::from_secs(1);
    p.picker.open(t1);
    p.picker.pointer_down(
        8,
        PointerEvent::touch(4, Point::new(60.0, 260.0)),
        t1,
    );
    p.picker.tick(t1 + HOLD);
    p.picker
        .pointer_move(PointerEvent::touch(4, Point::new(60.0, 700.0)), t1 + HOLD);
    let up = p.picker.pointer_up(
        lifted(PointerEvent::touch(4, Point::new(60.0, 700.0))),
        t1 + HOLD,
    );
    assert!(up.has_command(HostCommand::CloseSurface));
    assert_eq!(names(&p.items), ["A", "B", "D", "E", "C", "F", "G", "H", "I"]);
    assert_eq!(p.visible.get(), 5);
    assert_eq!(p.store.load_visible_count(9, 8), 5);
}

#[test]
fn promote_caps_visible_count() {
    let mut p = page(10, 8);
    let t0 = Instant::now();
    p.picker.open(t0);
    // Index 9 sits at row 2, column 1 of the 4-column grid.
    p.picker.pointer_down(9, PointerEvent::touch(2, Point::new(160.0, 260.0)), t0);
    p.picker.tick(t0 + HOLD);
    p.picker
        .pointer_move(PointerEvent::touch(2, Point::new(900.0, 200.0)), t0 + HOLD);
    p.picker.pointer_up(
        lifted(PointerEvent::touch(2, Point::new(900.0, 200.0))),
        t0 + HOLD,
    );
    assert_eq!(p.visible.get(), 8);
    assert_eq!(names(&p.items)[8], "J");
}
