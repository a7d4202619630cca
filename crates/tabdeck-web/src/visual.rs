#![forbid(unsafe_code)]

//! Per-item visual state for renderers.
//!
//! The controller never styles elements itself. It reports an [`ItemVisual`]
//! per index and the host maps it onto `transform`, `opacity`, `z-index`
//! and `transition`.

use std::fmt::Write as _;
use std::time::Duration;

use tabdeck_core::{CubicBezier, Offset};

use crate::config::{LIFT_OPACITY, LIFT_ROTATION_DEG};

/// How a change to an item's transform should animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionSpec {
    /// Jump immediately (held item, or the frame after a splice).
    None,
    Animate {
        duration: Duration,
        easing: CubicBezier,
    },
}

impl TransitionSpec {
    /// CSS `transition` value for the `transform` property.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::None => "none".to_owned(),
            Self::Animate { duration, easing } => {
                format!("transform {}ms {easing}", duration.as_millis())
            }
        }
    }
}

/// Rendered state of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub offset: Offset,
    pub scale: f32,
    pub rotation_deg: f32,
    pub opacity: f32,
    /// Drawn above its siblings.
    pub raised: bool,
    pub transition: TransitionSpec,
}

impl ItemVisual {
    /// An item at rest in its own slot.
    #[must_use]
    pub const fn at_rest(transition: TransitionSpec) -> Self {
        Self {
            offset: Offset::ZERO,
            scale: 1.0,
            rotation_deg: 0.0,
            opacity: 1.0,
            raised: false,
            transition,
        }
    }

    /// A sibling shifted by `offset`.
    #[must_use]
    pub const fn shifted(offset: Offset, transition: TransitionSpec) -> Self {
        Self {
            offset,
            ..Self::at_rest(transition)
        }
    }

    /// The held item, following the pointer.
    #[must_use]
    pub const fn lifted(offset: Offset, scale: f32) -> Self {
        Self {
            offset,
            scale,
            rotation_deg: LIFT_ROTATION_DEG,
            opacity: LIFT_OPACITY,
            raised: true,
            transition: TransitionSpec::None,
        }
    }

    /// The released item sliding into its new slot.
    #[must_use]
    pub const fn settling(offset: Offset, transition: TransitionSpec) -> Self {
        Self {
            offset,
            raised: true,
            ..Self::at_rest(transition)
        }
    }

    /// CSS `transform` value.
    #[must_use]
    pub fn transform_css(&self) -> String {
        let mut css = format!("translate({}px, {}px)", self.offset.dx, self.offset.dy);
        if self.scale != 1.0 {
            let _ = write!(css, " scale({})", self.scale);
        }
        if self.rotation_deg != 0.0 {
            let _ = write!(css, " rotate({}deg)", self.rotation_deg);
        }
        css
    }
}

/// Dock hover magnification for item `index`.
///
/// The hovered icon grows most, its neighbours less; nothing grows while a
/// drag is in progress.
#[must_use]
pub fn magnification(index: usize, hovered: Option<usize>, dragging: bool) -> f32 {
    let Some(hovered) = hovered else {
        return 1.0;
    };
    if dragging {
        return 1.0;
    }
    match index.abs_diff(hovered) {
        0 => 1.3,
        1 => 1.15,
        2 => 1.05,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnification_falls_off() {
        let scales: Vec<f32> = (0..6).map(|i| magnification(i, Some(2), false)).collect();
        assert_eq!(scales, vec![1.05, 1.15, 1.3, 1.15, 1.05, 1.0]);
        assert_eq!(magnification(2, Some(2), true), 1.0);
        assert_eq!(magnification(2, None, false), 1.0);
    }

    #[test]
    fn transition_css() {
        assert_eq!(TransitionSpec::None.css(), "none");
        let spec = TransitionSpec::Animate {
            duration: Duration::from_millis(500),
            easing: CubicBezier::DECELERATE,
        };
        assert_eq!(spec.css(), "transform 500ms cubic-bezier(0.16, 1, 0.3, 1)");
    }

    #[test]
    fn transform_css_omits_identity_parts() {
        let rest = ItemVisual::at_rest(TransitionSpec::None);
        assert_eq!(rest.transform_css(), "translate(0px, 0px)");
        let lifted = ItemVisual::lifted(Offset::new(12.5, -4.0), 1.1);
        assert_eq!(
            lifted.transform_css(),
            "translate(12.5px, -4px) scale(1.1) rotate(3deg)"
        );
        assert!(lifted.raised);
        assert_eq!(lifted.opacity, 0.9);
    }
}
