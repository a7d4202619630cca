#![forbid(unsafe_code)]

//! Animation primitives for drag completion and sibling shifts.
//!
//! Hosts that let CSS run transitions only need the [`CubicBezier`] `Display`
//! form. Hosts that paint frame by frame sample an [`OffsetTransition`] with
//! [`OffsetTransition::offset_at`].

use std::fmt;
use std::time::Duration;

use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Cubic bezier
// ---------------------------------------------------------------------------

/// A CSS `cubic-bezier(x1, y1, x2, y2)` timing curve.
///
/// Endpoints are fixed at (0, 0) and (1, 1). `x1` and `x2` are clamped into
/// [0, 1] so the curve stays a function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// Standard curve used for completion slides: `cubic-bezier(0.4, 0, 0.2, 1)`.
    pub const STANDARD: Self = Self {
        x1: 0.4,
        y1: 0.0,
        x2: 0.2,
        y2: 1.0,
    };

    /// Strong deceleration used for dock sibling shifts:
    /// `cubic-bezier(0.16, 1, 0.3, 1)`.
    pub const DECELERATE: Self = Self {
        x1: 0.16,
        y1: 1.0,
        x2: 0.3,
        y2: 1.0,
    };

    #[must_use]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            crate::warn!(x1, x2, "cubic-bezier x control points clamped into [0, 1]");
        }
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Control points as `(x1, y1, x2, y2)`.
    #[must_use]
    pub const fn control_points(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    fn axis(p1: f32, p2: f32, s: f32) -> f32 {
        // B(s) = 3(1-s)^2 s p1 + 3(1-s) s^2 p2 + s^3
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    fn axis_slope(p1: f32, p2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    /// Curve parameter `s` whose x coordinate equals `x`.
    fn solve_s(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..8 {
            let err = Self::axis(self.x1, self.x2, s) - x;
            if err.abs() < 1e-6 {
                return s;
            }
            let slope = Self::axis_slope(self.x1, self.x2, s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..32 {
            let value = Self::axis(self.x1, self.x2, s);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }

    /// Eased output for linear progress `t`.
    #[must_use]
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = self.solve_s(t);
        Self::axis(self.y1, self.y2, s)
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

// ---------------------------------------------------------------------------
// OffsetTransition
// ---------------------------------------------------------------------------

/// Eased slide between two offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetTransition {
    from: Offset,
    to: Offset,
    duration: Duration,
    easing: CubicBezier,
}

impl OffsetTransition {
    /// Slide from `from` to `to` over `duration` on the standard curve.
    ///
    /// A zero duration is stored as 1ns so any elapsed time lands on `to`.
    #[must_use]
    pub fn new(from: Offset, to: Offset, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: CubicBezier::STANDARD,
        }
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: CubicBezier) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn target(&self) -> Offset {
        self.to
    }

    /// Offset after `elapsed` from the start.
    #[must_use]
    pub fn offset_at(&self, elapsed: Duration) -> Offset {
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()) as f32;
        self.from.lerp(self.to, self.easing.sample(t))
    }
}
