#![forbid(unsafe_code)]

//! Breakpoint-dependent values.
//!
//! [`Responsive<T>`] maps [`Breakpoint`] tiers to values with inheritance
//! from smaller tiers: a tier without an explicit value uses the nearest
//! smaller tier that has one, ending at the base value for `Xs`.
//!
//! ```
//! use tabdeck_layout::{Breakpoint, Responsive};
//!
//! let columns = Responsive::new(3).at(Breakpoint::Sm, 4);
//! assert_eq!(*columns.resolve(Breakpoint::Xs), 3);
//! assert_eq!(*columns.resolve(Breakpoint::Lg), 4);
//! ```

use super::{Breakpoint, Breakpoints};

/// A breakpoint-aware value with inheritance from smaller tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    base: T,
    /// Overrides for Sm..=Xl, indexed by `Breakpoint` ordinal minus one.
    overrides: [Option<T>; 4],
}

impl<T: Clone> Responsive<T> {
    /// Create a responsive value with a base value for `Xs`.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            overrides: [None, None, None, None],
        }
    }

    /// Set the value for a specific breakpoint (builder pattern).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    /// Set the value for a specific breakpoint. Setting `Xs` replaces the base.
    pub fn set(&mut self, bp: Breakpoint, value: T) {
        match bp {
            Breakpoint::Xs => self.base = value,
            other => self.overrides[other as usize - 1] = Some(value),
        }
    }

    /// Resolve the value for a given breakpoint.
    #[must_use]
    pub fn resolve(&self, bp: Breakpoint) -> &T {
        let idx = bp as usize;
        (1..=idx)
            .rev()
            .find_map(|i| self.overrides[i - 1].as_ref())
            .unwrap_or(&self.base)
    }

    /// Resolve the value for a viewport width under `breakpoints`.
    #[must_use]
    pub fn resolve_px(&self, breakpoints: Breakpoints, width: f32) -> &T {
        self.resolve(breakpoints.classify_px(width))
    }

    /// Whether a specific breakpoint has an explicit (non-inherited) value.
    #[must_use]
    pub fn has_explicit(&self, bp: Breakpoint) -> bool {
        match bp {
            Breakpoint::Xs => true,
            other => self.overrides[other as usize - 1].is_some(),
        }
    }
}

impl<T: Clone + Default> Default for Responsive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
