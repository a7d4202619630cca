#![forbid(unsafe_code)]

//! Slot metrics, hit-testing, and sibling displacement.
//!
//! Two layouts share one contract:
//!
//! - **Row** (dock): slot `i` starts at `left + i * stride`.
//!   Hit index = `round((x - left) / stride)` clamped to `[0, n-1]`.
//! - **Grid** (picker): slot `i` sits at column `i % columns`, row
//!   `i / columns`. Hit column = `round((x - left) / cell_width)` clamped to
//!   `[0, columns-1]`, hit row = `floor((y - top) / cell_height)` clamped to
//!   `>= 0`, index = `min(n-1, row * columns + column)`.
//!
//! # Invariants
//!
//! 1. Every hit index lies in `[0, n-1]`; an empty collection has no hit.
//! 2. Sibling displacement while an item is held equals the slot change the
//!    committed splice would cause, including row wrap in grids.

use serde::{Deserialize, Serialize};
use tabdeck_core::{Offset, Point, Rect, Size};

use crate::provider::SurfaceGeometry;

/// Clamp a floating slot coordinate into `[0, max]`. NaN maps to 0.
fn clamp_slot(value: f32, max: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // Float-to-int casts saturate, so +inf lands on usize::MAX before the min.
    (value as usize).min(max)
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// Fixed-stride single row (the dock).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    left: f32,
    top: f32,
    stride: f32,
    count: usize,
}

impl RowMetrics {
    /// Row starting at `container`'s left edge with `count` slots.
    ///
    /// Returns `None` when `stride` is not a positive finite number.
    #[must_use]
    pub fn new(container: Rect, stride: f32, count: usize) -> Option<Self> {
        if !stride.is_finite() || stride <= 0.0 {
            return None;
        }
        Some(Self {
            left: container.left(),
            top: container.top(),
            stride,
            count,
        })
    }

    #[must_use]
    pub const fn stride(&self) -> f32 {
        self.stride
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Slot under `point`, clamped to the row.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        let last = self.count.checked_sub(1)?;
        let column = ((point.x - self.left) / self.stride).round();
        Some(clamp_slot(column, last))
    }

    /// Top-left of slot `index` relative to the row origin.
    #[must_use]
    pub fn slot_position(&self, index: usize) -> Offset {
        Offset::new(index as f32 * self.stride, 0.0)
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Multi-row grid with equal cells (the picker).
///
/// Cell size is derived from the measured container: `width / columns` by
/// `height / rows`, where `rows = max(1, ceil(count / columns))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    left: f32,
    top: f32,
    columns: usize,
    rows: usize,
    cell: CellSize,
    count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct CellSize {
    width: f32,
    height: f32,
}

impl GridMetrics {
    /// Measure a grid of `count` items laid out in `columns` columns.
    ///
    /// Returns `None` for a zero-sized container or zero columns; callers
    /// skip the update in that case.
    #[must_use]
    pub fn measure(container: Rect, count: usize, columns: usize) -> Option<Self> {
        if container.is_empty() || columns == 0 {
            return None;
        }
        let rows = count.div_ceil(columns).max(1);
        Some(Self {
            left: container.left(),
            top: container.top(),
            columns,
            rows,
            cell: CellSize {
                width: container.width / columns as f32,
                height: container.height / rows as f32,
            },
            count,
        })
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn cell_size(&self) -> Size {
        Size::new(self.cell.width, self.cell.height)
    }

    /// Slot under `point`. Columns round, rows floor.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        let last = self.count.checked_sub(1)?;
        let column = clamp_slot(
            ((point.x - self.left) / self.cell.width).round(),
            self.columns - 1,
        );
        let row = clamp_slot(((point.y - self.top) / self.cell.height).floor(), usize::MAX);
        let index = row.saturating_mul(self.columns).saturating_add(column);
        Some(index.min(last))
    }

    /// Top-left of slot `index` relative to the grid origin.
    #[must_use]
    pub fn slot_position(&self, index: usize) -> Offset {
        let column = index % self.columns;
        let row = index / self.columns;
        Offset::new(
            column as f32 * self.cell.width,
            row as f32 * self.cell.height,
        )
    }
}

// ---------------------------------------------------------------------------
// SlotLayout
// ---------------------------------------------------------------------------

/// Slot layout of one collection surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum SlotLayout {
    Row(RowMetrics),
    Grid(GridMetrics),
}

impl SlotLayout {
    /// Number of slots.
    #[must_use]
    pub const fn count(&self) -> usize {
        match self {
            Self::Row(row) => row.count,
            Self::Grid(grid) => grid.count,
        }
    }

    /// Slot under `point`; `None` only for an empty collection.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        match self {
            Self::Row(row) => row.hit_test(point),
            Self::Grid(grid) => grid.hit_test(point),
        }
    }

    /// Top-left of slot `index` relative to the layout origin.
    #[must_use]
    pub fn slot_position(&self, index: usize) -> Offset {
        match self {
            Self::Row(row) => row.slot_position(index),
            Self::Grid(grid) => grid.slot_position(index),
        }
    }

    /// Translation that carries slot `from` onto slot `to`.
    #[must_use]
    pub fn slot_delta(&self, from: usize, to: usize) -> Offset {
        self.slot_position(to) - self.slot_position(from)
    }

    /// Translation of item `index` while the item at `origin` is held over
    /// `target`. Zero for the held item itself and for unaffected items.
    #[must_use]
    pub fn sibling_offset(&self, index: usize, origin: usize, target: usize) -> Offset {
        if index == origin {
            return Offset::ZERO;
        }
        let slot = displaced_slot(index, origin, target);
        if slot == index {
            Offset::ZERO
        } else {
            self.slot_delta(index, slot)
        }
    }
}

/// Slot that item `index` occupies after moving `origin` to `target`.
///
/// Moving forward, items in `(origin, target]` shift back one slot; moving
/// backward, items in `[target, origin)` shift forward one slot. The moved
/// item itself lands on `target`.
#[must_use]
pub fn displaced_slot(index: usize, origin: usize, target: usize) -> usize {
    if index == origin {
        target
    } else if origin < target && index > origin && index <= target {
        index - 1
    } else if origin > target && index >= target && index < origin {
        index + 1
    } else {
        index
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Where a pointer sits relative to a collection surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Over the surface; hit-testing and snapping apply.
    Inside,
    /// Off the surface (picker drag-out).
    Outside,
    /// Over the transfer target (dock switcher).
    DropZone,
}

/// How a surface classifies pointer positions into [`Region`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DropRule {
    /// Outside the content bounds, or within `bottom_band` pixels of the
    /// viewport bottom, counts as [`Region::Outside`].
    OutsideContent { bottom_band: f32 },
    /// The geometry's drop zone counts as [`Region::DropZone`]; the rest of
    /// the container is inside and everything else outside.
    DropZone,
}

impl DropRule {
    /// Classify `point` against measured `geometry`.
    #[must_use]
    pub fn classify(&self, geometry: &SurfaceGeometry, point: Point) -> Region {
        match *self {
            Self::OutsideContent { bottom_band } => {
                let content = geometry.content.unwrap_or(geometry.container);
                let near_bottom = point.y > geometry.viewport.height - bottom_band;
                if !content.contains(point) || near_bottom {
                    Region::Outside
                } else {
                    Region::Inside
                }
            }
            Self::DropZone => {
                if geometry.drop_zone.is_some_and(|zone| zone.contains(point)) {
                    Region::DropZone
                } else if geometry.container.contains(point) {
                    Region::Inside
                } else {
                    Region::Outside
                }
            }
        }
    }
}
