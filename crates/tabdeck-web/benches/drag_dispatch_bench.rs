#![forbid(unsafe_code)]

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use tabdeck_core::{Instant, Point, PointerButton, PointerButtons, PointerEvent, Rect, Size};
use tabdeck_layout::{StaticGeometry, SurfaceGeometry};
use tabdeck_runtime::PolicyConfig;
use tabdeck_web::{ReorderConfig, ReorderController};

fn mouse(x: f32, y: f32) -> PointerEvent {
    PointerEvent::mouse(7, PointerButton::Primary, Point::new(x, y))
}

fn dock_geometry() -> StaticGeometry {
    StaticGeometry::new(
        SurfaceGeometry::new(Rect::new(0.0, 0.0, 432.0, 48.0), Size::new(1280.0, 800.0))
            .with_drop_zone(Rect::new(440.0, 0.0, 48.0, 48.0)),
    )
}

fn picker_geometry() -> StaticGeometry {
    StaticGeometry::new(
        SurfaceGeometry::new(Rect::new(40.0, 40.0, 480.0, 480.0), Size::new(1280.0, 800.0))
            .with_content(Rect::new(0.0, 0.0, 560.0, 600.0)),
    )
}

fn bench_drag_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder/web_drag/lifecycle");
    let policy = PolicyConfig::default();

    group.bench_function("dock_press_hold_move_32_commit", |b| {
        b.iter(|| {
            let mut adapter =
                ReorderController::new(ReorderConfig::dock(&policy), dock_geometry(), 8)
                    .expect("default dock config should be valid");
            let t0 = Instant::now();
            let down = adapter.pointer_down(0, mouse(20.0, 24.0), t0);
            black_box(down.log.phase);
            adapter.tick(t0 + Duration::from_millis(500));

            for step in 0..32 {
                let dispatch = adapter.pointer_move(mouse(20.0 + step as f32 * 6.0, 24.0), t0);
                black_box(dispatch.transition.map(|t| t.transition_id));
            }

            let up = adapter.pointer_up(
                mouse(212.0, 24.0).with_buttons(PointerButtons::empty()),
                t0 + Duration::from_millis(800),
            );
            black_box(up.commands.len());
            let commit = adapter.tick(t0 + Duration::from_millis(1200));
            black_box(commit.settled);
        });
    });

    group.bench_function("picker_press_hold_move_120_drop_out", |b| {
        b.iter(|| {
            let mut adapter =
                ReorderController::new(ReorderConfig::picker(&policy), picker_geometry(), 16)
                    .expect("default picker config should be valid");
            let t0 = Instant::now();
            adapter.set_surface_open(true, t0);
            adapter.pointer_down(5, mouse(180.0, 160.0), t0);
            adapter.tick(t0 + Duration::from_millis(500));

            for step in 0..120 {
                let x = 180.0 + (step * 4) as f32;
                let y = 160.0 + (step % 7) as f32 * 20.0;
                let dispatch = adapter.pointer_move(mouse(x, y), t0);
                black_box(dispatch.transition.map(|t| t.effect));
            }

            let up = adapter.pointer_up(
                mouse(700.0, 300.0).with_buttons(PointerButtons::empty()),
                t0 + Duration::from_millis(900),
            );
            black_box(up.settled);
        });
    });

    group.finish();
}

fn bench_item_visuals(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder/web_drag/item_visual");
    let mut adapter =
        ReorderController::new(ReorderConfig::dock(&PolicyConfig::default()), dock_geometry(), 8)
            .expect("default dock config should be valid");
    let t0 = Instant::now();
    adapter.pointer_down(1, mouse(74.0, 24.0), t0);
    adapter.tick(t0 + Duration::from_millis(500));
    adapter.pointer_move(mouse(300.0, 24.0), t0);

    group.bench_function("dragging_8_items", |b| {
        b.iter(|| {
            for index in 0..8 {
                black_box(adapter.item_visual(black_box(index)).transform_css());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_drag_lifecycle, bench_item_visuals);
criterion_main!(benches);
