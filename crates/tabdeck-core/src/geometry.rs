#![forbid(unsafe_code)]

//! CSS-pixel geometry primitives.
//!
//! All coordinates are viewport-relative CSS pixels as reported by
//! `getBoundingClientRect()` and pointer `clientX`/`clientY`.

use std::ops::{Add, Mul, Sub};

/// A viewport-relative pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset that moves `origin` onto `self`.
    #[must_use]
    pub fn offset_from(self, origin: Point) -> Offset {
        Offset::new(self.x - origin.x, self.y - origin.y)
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

/// A translation in CSS pixels (the `translate(dx, dy)` of an item).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Largest absolute component (Chebyshev length).
    #[must_use]
    pub fn max_abs(self) -> f32 {
        self.dx.abs().max(self.dy.abs())
    }

    /// Linear interpolation toward `target` by `t` (unclamped).
    #[must_use]
    pub fn lerp(self, target: Offset, t: f32) -> Offset {
        Offset::new(
            self.dx + (target.dx - self.dx) * t,
            self.dy + (target.dy - self.dy) * t,
        )
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Mul<f32> for Offset {
    type Output = Offset;

    fn mul(self, rhs: f32) -> Offset {
        Offset::new(self.dx * rhs, self.dy * rhs)
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative, or not finite.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Edge-inclusive containment, matching DOM rect checks
    /// (`x >= left && x <= right`).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Position of `point` relative to the top-left corner.
    #[must_use]
    pub fn local(&self, point: Point) -> Offset {
        point.offset_from(Point::new(self.x, self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_edge_inclusive() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(r.contains(Point::new(110.0, 70.0)));
        assert!(!r.contains(Point::new(110.1, 70.0)));
        assert!(!r.contains(Point::new(9.9, 40.0)));
    }

    #[test]
    fn empty_rects() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_empty());
        assert!(Rect::new(0.0, 0.0, f32::NAN, 10.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn offset_norms() {
        let o = Offset::new(3.0, -4.0);
        assert_eq!(o.length(), 5.0);
        assert_eq!(o.max_abs(), 4.0);
        assert!(Offset::ZERO.is_zero());
    }

    #[test]
    fn lerp_moves_fraction_of_distance() {
        let raw = Offset::new(10.0, 0.0);
        let snap = Offset::new(60.0, 20.0);
        let blended = raw.lerp(snap, 0.2);
        assert_eq!(blended, Offset::new(20.0, 4.0));
    }

    #[test]
    fn local_is_relative_to_top_left() {
        let r = Rect::new(100.0, 50.0, 200.0, 200.0);
        assert_eq!(r.local(Point::new(130.0, 80.0)), Offset::new(30.0, 30.0));
        assert_eq!(Point::new(1.0, 2.0) + Offset::new(3.0, 4.0), Point::new(4.0, 6.0));
    }
}
