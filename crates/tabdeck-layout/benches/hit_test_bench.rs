//! Benchmarks for per-move hit-testing and sibling displacement.
//!
//! Run with: cargo bench -p tabdeck-layout --bench hit_test_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tabdeck_core::{Point, Rect};
use tabdeck_layout::{GridMetrics, RowMetrics, SlotLayout};

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("slots/hit_test");

    for count in [8usize, 32, 128] {
        let grid = SlotLayout::Grid(
            GridMetrics::measure(Rect::new(0.0, 0.0, 640.0, 480.0), count, 4)
                .expect("non-empty container"),
        );
        group.bench_with_input(BenchmarkId::new("grid", count), &grid, |b, layout| {
            b.iter(|| {
                let mut acc = 0usize;
                for step in 0..64 {
                    let p = Point::new(step as f32 * 10.0, step as f32 * 7.5);
                    acc += layout.hit_test(black_box(p)).unwrap_or(0);
                }
                black_box(acc)
            })
        });
    }

    let row = SlotLayout::Row(
        RowMetrics::new(Rect::new(0.0, 0.0, 432.0, 48.0), 54.0, 8).expect("positive stride"),
    );
    group.bench_function("row/8", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for step in 0..64 {
                let p = Point::new(step as f32 * 7.0, 24.0);
                acc += row.hit_test(black_box(p)).unwrap_or(0);
            }
            black_box(acc)
        })
    });

    group.finish();
}

fn bench_sibling_offsets(c: &mut Criterion) {
    let grid = SlotLayout::Grid(
        GridMetrics::measure(Rect::new(0.0, 0.0, 640.0, 480.0), 32, 4)
            .expect("non-empty container"),
    );
    c.bench_function("slots/sibling_offsets/32", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for index in 0..32 {
                let offset = grid.sibling_offset(index, black_box(3), black_box(27));
                sum += offset.dx + offset.dy;
            }
            black_box(sum)
        })
    });
}

criterion_group!(benches, bench_hit_test, bench_sibling_offsets);
criterion_main!(benches);
