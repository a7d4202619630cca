#![forbid(unsafe_code)]

//! Slot geometry for reorderable collections.
//!
//! # Role in tabdeck
//! `tabdeck-layout` answers the geometric questions a drag session asks:
//! which slot is under the pointer, how far apart two slots are, where each
//! sibling shifts while an item is held, and what the collection looks like
//! after a reorder or a transfer between the dock and its overflow.
//!
//! # Primary responsibilities
//! - **Breakpoints**: [`Breakpoint`] tiers and [`Responsive`] values for the
//!   picker's column count.
//! - **Slots**: [`GridMetrics`] and [`RowMetrics`] behind [`SlotLayout`].
//! - **Regions**: [`DropRule`] classifies a pointer as inside the surface,
//!   outside it, or over a drop zone.
//! - **Edits**: [`CollectionEdit`] describes settled changes as plain data.
//! - **Measurement seam**: [`GeometryProvider`] supplies live bounds.
//!
//! # How it fits in the system
//! The drag machine in `tabdeck-web` calls into a [`SlotLayout`] on every
//! pointer move and emits a [`CollectionEdit`] when a gesture settles.

pub mod provider;
pub mod reorder;
pub mod responsive;
pub mod slots;

pub use provider::{FnGeometry, GeometryProvider, StaticGeometry, SurfaceGeometry};
pub use reorder::{CollectionEdit, clamp_visible_count, move_item};
pub use responsive::Responsive;
pub use slots::{DropRule, GridMetrics, Region, RowMetrics, SlotLayout, displaced_slot};

/// Responsive width tiers, in CSS pixels.
///
/// | Breakpoint | Viewport width |
/// |-----------|----------------|
/// | `Xs`      | < 640          |
/// | `Sm`      | 640–767        |
/// | `Md`      | 768–1023       |
/// | `Lg`      | 1024–1279      |
/// | `Xl`      | 1280+          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    /// Phones and narrow windows.
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    #[inline]
    const fn index(self) -> u8 {
        match self {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => 1,
            Breakpoint::Md => 2,
            Breakpoint::Lg => 3,
            Breakpoint::Xl => 4,
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Breakpoint thresholds for responsive layouts.
///
/// Each field is the minimum viewport width (CSS pixels) for that tier.
/// Xs implicitly starts at width 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
    pub xl: u16,
}

impl Breakpoints {
    /// Default breakpoints: 640 / 768 / 1024 / 1280 pixels.
    pub const DEFAULT: Self = Self {
        sm: 640,
        md: 768,
        lg: 1024,
        xl: 1280,
    };

    /// Create breakpoints with explicit thresholds.
    ///
    /// Values are sanitized to be monotonically non-decreasing.
    pub const fn new(sm: u16, md: u16, lg: u16, xl: u16) -> Self {
        let md = if md < sm { sm } else { md };
        let lg = if lg < md { md } else { lg };
        let xl = if xl < lg { lg } else { xl };
        Self { sm, md, lg, xl }
    }

    /// Classify a width into a breakpoint bucket.
    #[inline]
    pub const fn classify_width(self, width: u16) -> Breakpoint {
        if width >= self.xl {
            Breakpoint::Xl
        } else if width >= self.lg {
            Breakpoint::Lg
        } else if width >= self.md {
            Breakpoint::Md
        } else if width >= self.sm {
            Breakpoint::Sm
        } else {
            Breakpoint::Xs
        }
    }

    /// Classify a fractional viewport width.
    ///
    /// Fractions are truncated, so 639.9 stays below a 640 threshold.
    #[inline]
    pub fn classify_px(self, width: f32) -> Breakpoint {
        let clamped = if width.is_finite() {
            width.clamp(0.0, f32::from(u16::MAX))
        } else {
            0.0
        };
        self.classify_width(clamped as u16)
    }

    /// Check if width is at least a given breakpoint.
    #[inline]
    pub const fn at_least(self, width: u16, min: Breakpoint) -> bool {
        self.classify_width(width).index() >= min.index()
    }

    /// Get the minimum width threshold for a given breakpoint.
    #[must_use]
    pub const fn threshold(self, bp: Breakpoint) -> u16 {
        match bp {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_default_widths() {
        let bp = Breakpoints::DEFAULT;
        assert_eq!(bp.classify_width(0), Breakpoint::Xs);
        assert_eq!(bp.classify_width(639), Breakpoint::Xs);
        assert_eq!(bp.classify_width(640), Breakpoint::Sm);
        assert_eq!(bp.classify_width(1000), Breakpoint::Md);
        assert_eq!(bp.classify_width(1920), Breakpoint::Xl);
    }

    #[test]
    fn classify_px_truncates() {
        let bp = Breakpoints::DEFAULT;
        assert_eq!(bp.classify_px(639.9), Breakpoint::Xs);
        assert_eq!(bp.classify_px(640.0), Breakpoint::Sm);
        assert_eq!(bp.classify_px(-5.0), Breakpoint::Xs);
        assert_eq!(bp.classify_px(f32::NAN), Breakpoint::Xs);
        assert_eq!(bp.classify_px(1e9), Breakpoint::Xl);
    }

    #[test]
    fn new_sanitizes_order() {
        let bp = Breakpoints::new(700, 600, 500, 400);
        assert_eq!(bp, Breakpoints::new(700, 700, 700, 700));
        assert_eq!(bp.threshold(Breakpoint::Xs), 0);
        assert!(bp.at_least(700, Breakpoint::Xl));
    }
}
