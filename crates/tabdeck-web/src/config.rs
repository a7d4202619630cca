#![forbid(unsafe_code)]

//! Per-surface controller configuration.

use std::time::Duration;

use tabdeck_core::CubicBezier;
use tabdeck_layout::{Breakpoints, DropRule, Responsive};
use tabdeck_runtime::PolicyConfig;

/// How a surface lays out its slots.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotShape {
    /// Fixed-stride single row.
    Row { stride: f32 },
    /// Grid whose column count follows the viewport width.
    Grid {
        columns: Responsive<usize>,
        breakpoints: Breakpoints,
    },
}

impl SlotShape {
    /// Column count at viewport `width`; rows always report 1.
    #[must_use]
    pub fn columns_at(&self, width: f32) -> usize {
        match self {
            Self::Row { .. } => 1,
            Self::Grid {
                columns,
                breakpoints,
            } => *columns.resolve_px(*breakpoints, width),
        }
    }
}

/// Tunables for one [`ReorderController`](crate::ReorderController).
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderConfig {
    /// Hold time before a press becomes a drag.
    pub long_press: Duration,
    /// Euclidean movement that abandons a pending press.
    pub arm_slop: f32,
    /// Per-axis offset past which the gesture counts as moved.
    pub move_threshold: f32,
    /// How long the moved flag outlives the gesture.
    pub click_guard: Duration,
    /// Slide-to-slot time before the splice.
    pub completion: Duration,
    pub completion_easing: CubicBezier,
    /// Fraction of the gap to the snapped slot applied while inside.
    pub snap_blend: f32,
    pub sibling_transition: Duration,
    pub sibling_easing: CubicBezier,
    /// Scale of the held item.
    pub lift_scale: f32,
    pub slots: SlotShape,
    pub drop_rule: DropRule,
    /// Periodic re-measure while a session or the surface is live.
    pub remeasure_every: Option<Duration>,
}

/// Rotation of the held item, in degrees.
pub const LIFT_ROTATION_DEG: f32 = 3.0;
/// Opacity of the held item.
pub const LIFT_OPACITY: f32 = 0.9;

impl ReorderConfig {
    /// App picker grid with the shipped policy.
    #[must_use]
    pub fn picker(policy: &PolicyConfig) -> Self {
        let picker = &policy.picker;
        let breakpoints = Breakpoints::new(picker.wide_min_width_px, 768, 1024, 1280);
        Self {
            long_press: policy.gesture.long_press(),
            arm_slop: policy.gesture.arm_slop_px,
            move_threshold: policy.gesture.move_threshold_px,
            click_guard: policy.gesture.click_guard(),
            completion: Duration::from_millis(picker.completion_ms),
            completion_easing: CubicBezier::STANDARD,
            snap_blend: picker.snap_blend,
            sibling_transition: Duration::from_millis(picker.sibling_transition_ms),
            sibling_easing: CubicBezier::STANDARD,
            lift_scale: 1.06,
            slots: SlotShape::Grid {
                columns: Responsive::new(picker.narrow_columns)
                    .at(tabdeck_layout::Breakpoint::Sm, picker.wide_columns),
                breakpoints,
            },
            drop_rule: DropRule::OutsideContent {
                bottom_band: picker.bottom_drop_band_px,
            },
            remeasure_every: Some(Duration::from_millis(picker.remeasure_interval_ms)),
        }
    }

    /// Dock row with the shipped policy.
    #[must_use]
    pub fn dock(policy: &PolicyConfig) -> Self {
        let dock = &policy.dock;
        Self {
            long_press: policy.gesture.long_press(),
            arm_slop: policy.gesture.arm_slop_px,
            move_threshold: policy.gesture.move_threshold_px,
            click_guard: policy.gesture.click_guard(),
            completion: Duration::from_millis(dock.completion_ms),
            completion_easing: CubicBezier::STANDARD,
            snap_blend: dock.snap_blend,
            sibling_transition: Duration::from_millis(dock.sibling_transition_ms),
            sibling_easing: CubicBezier::DECELERATE,
            lift_scale: 1.1,
            slots: SlotShape::Row {
                stride: dock.stride(),
            },
            drop_rule: DropRule::DropZone,
            remeasure_every: None,
        }
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self::picker(&PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_columns_follow_width() {
        let config = ReorderConfig::picker(&PolicyConfig::default());
        assert_eq!(config.slots.columns_at(639.0), 3);
        assert_eq!(config.slots.columns_at(640.0), 4);
        assert_eq!(config.slots.columns_at(1920.0), 4);
        assert_eq!(config.completion, Duration::from_millis(300));
    }

    #[test]
    fn dock_uses_row_stride() {
        let config = ReorderConfig::dock(&PolicyConfig::default());
        assert_eq!(config.slots, SlotShape::Row { stride: 54.0 });
        assert_eq!(config.completion, Duration::from_millis(350));
        assert_eq!(config.drop_rule, DropRule::DropZone);
        assert_eq!(config.remeasure_every, None);
    }

    #[test]
    fn policy_overrides_flow_through() {
        let mut policy = PolicyConfig::default();
        policy.gesture.long_press_ms = 350;
        policy.picker.wide_min_width_px = 720;
        let config = ReorderConfig::picker(&policy);
        assert_eq!(config.long_press, Duration::from_millis(350));
        assert_eq!(config.slots.columns_at(700.0), 3);
        assert_eq!(config.slots.columns_at(720.0), 4);
    }
}
