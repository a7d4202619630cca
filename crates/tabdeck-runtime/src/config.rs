#![forbid(unsafe_code)]

//! Policy-as-data configuration for drag interactions.
//!
//! Every tunable timing, threshold, and blend factor lives in one
//! [`PolicyConfig`] that can be loaded from TOML or JSON at startup.
//!
//! ```toml
//! # tabdeck.toml
//! [gesture]
//! long_press_ms = 400
//!
//! [dock]
//! max_visible = 6
//! ```
//!
//! Every field defaults to the shipped behavior, so
//! `PolicyConfig::default()` and an empty file are equivalent.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level PolicyConfig
// ---------------------------------------------------------------------------

/// Tunables for both drag surfaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Press/arm/click parameters shared by every surface.
    pub gesture: GesturePolicyConfig,
    /// App picker grid.
    pub picker: PickerPolicyConfig,
    /// Dock row.
    pub dock: DockPolicyConfig,
}

impl PolicyConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyConfigError> {
        toml::from_str(s).map_err(PolicyConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(s).map_err(PolicyConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.gesture.long_press_ms == 0 {
            errors.push("gesture.long_press_ms must be > 0".into());
        }
        if !(self.gesture.arm_slop_px.is_finite() && self.gesture.arm_slop_px > 0.0) {
            errors.push(format!(
                "gesture.arm_slop_px must be > 0, got {}",
                self.gesture.arm_slop_px
            ));
        }
        if !(self.gesture.move_threshold_px.is_finite() && self.gesture.move_threshold_px >= 0.0) {
            errors.push(format!(
                "gesture.move_threshold_px must be >= 0, got {}",
                self.gesture.move_threshold_px
            ));
        }

        check_blend(&mut errors, "picker.snap_blend", self.picker.snap_blend);
        check_blend(&mut errors, "dock.snap_blend", self.dock.snap_blend);

        if self.picker.narrow_columns == 0 || self.picker.wide_columns == 0 {
            errors.push(format!(
                "picker columns must be > 0, got narrow={} wide={}",
                self.picker.narrow_columns, self.picker.wide_columns
            ));
        }
        if !(self.picker.bottom_drop_band_px.is_finite() && self.picker.bottom_drop_band_px >= 0.0)
        {
            errors.push(format!(
                "picker.bottom_drop_band_px must be >= 0, got {}",
                self.picker.bottom_drop_band_px
            ));
        }
        if self.picker.remeasure_interval_ms == 0 {
            errors.push("picker.remeasure_interval_ms must be > 0".into());
        }

        let stride = self.dock.icon_size_px + self.dock.icon_spacing_px;
        if !(stride.is_finite() && stride > 0.0) {
            errors.push(format!(
                "dock icon_size_px + icon_spacing_px must be > 0, got {stride}"
            ));
        }
        if self.dock.max_visible == 0 {
            errors.push("dock.max_visible must be > 0".into());
        }

        errors
    }

    /// Parse TOML and reject configurations that fail [`validate`](Self::validate).
    pub fn from_toml_str_validated(s: &str) -> Result<Self, PolicyConfigError> {
        let config = Self::from_toml_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(PolicyConfigError::Validation(errors))
        }
    }

    /// Serialize to TOML, for writing an annotated default file.
    pub fn to_toml_string(&self) -> Result<String, PolicyConfigError> {
        toml::to_string(self).map_err(PolicyConfigError::TomlSerialize)
    }
}

fn check_blend(errors: &mut Vec<String>, name: &str, value: f32) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!("{name} must be in [0, 1], got {value}"));
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Press, arm, and click-suppression parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GesturePolicyConfig {
    /// Hold time before a press becomes a drag. Default: 500.
    pub long_press_ms: u64,
    /// Movement (Euclidean px) that abandons a pending press. Default: 10.
    pub arm_slop_px: f32,
    /// Offset (px, per axis) after which a drag counts as moved and the
    /// trailing click is suppressed. Default: 5.
    pub move_threshold_px: f32,
    /// How long the moved flag outlives the gesture. Default: 100.
    pub click_guard_ms: u64,
}

impl Default for GesturePolicyConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            arm_slop_px: 10.0,
            move_threshold_px: 5.0,
            click_guard_ms: 100,
        }
    }
}

impl GesturePolicyConfig {
    #[must_use]
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    #[must_use]
    pub fn click_guard(&self) -> Duration {
        Duration::from_millis(self.click_guard_ms)
    }
}

/// App picker grid parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerPolicyConfig {
    /// Slide-to-slot duration before the splice. Default: 300.
    pub completion_ms: u64,
    /// Fraction of the remaining distance to the snapped slot applied on
    /// each move. Default: 0.2.
    pub snap_blend: f32,
    /// Columns below `wide_min_width_px`. Default: 3.
    pub narrow_columns: usize,
    /// Columns at or above `wide_min_width_px`. Default: 4.
    pub wide_columns: usize,
    /// Viewport width where the grid widens. Default: 640.
    pub wide_min_width_px: u16,
    /// Releasing within this distance of the viewport bottom counts as
    /// dropping outside. Default: 150.
    pub bottom_drop_band_px: f32,
    /// Re-measure period while the picker is open. Default: 250.
    pub remeasure_interval_ms: u64,
    /// Sibling shift duration. Default: 220.
    pub sibling_transition_ms: u64,
}

impl Default for PickerPolicyConfig {
    fn default() -> Self {
        Self {
            completion_ms: 300,
            snap_blend: 0.2,
            narrow_columns: 3,
            wide_columns: 4,
            wide_min_width_px: 640,
            bottom_drop_band_px: 150.0,
            remeasure_interval_ms: 250,
            sibling_transition_ms: 220,
        }
    }
}

/// Dock row parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockPolicyConfig {
    /// Slide-to-slot duration before the splice. Default: 350.
    pub completion_ms: u64,
    /// Default: 0.2.
    pub snap_blend: f32,
    /// Default: 48.
    pub icon_size_px: f32,
    /// Default: 6.
    pub icon_spacing_px: f32,
    /// Most items the dock shows. Default: 8.
    pub max_visible: usize,
    /// Sibling shift duration. Default: 500.
    pub sibling_transition_ms: u64,
}

impl Default for DockPolicyConfig {
    fn default() -> Self {
        Self {
            completion_ms: 350,
            snap_blend: 0.2,
            icon_size_px: 48.0,
            icon_spacing_px: 6.0,
            max_visible: 8,
            sibling_transition_ms: 500,
        }
    }
}

impl DockPolicyConfig {
    /// Distance between neighbouring slot origins.
    #[must_use]
    pub fn stride(&self) -> f32 {
        self.icon_size_px + self.icon_spacing_px
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a policy configuration.
#[derive(Debug)]
pub enum PolicyConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PolicyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PolicyConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSerialize(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_behavior() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.gesture.long_press(), Duration::from_millis(500));
        assert_eq!(policy.gesture.arm_slop_px, 10.0);
        assert_eq!(policy.gesture.move_threshold_px, 5.0);
        assert_eq!(policy.gesture.click_guard(), Duration::from_millis(100));
        assert_eq!(policy.picker.completion_ms, 300);
        assert_eq!(policy.dock.completion_ms, 350);
        assert_eq!(policy.dock.stride(), 54.0);
        assert_eq!(policy.dock.max_visible, 8);
        assert_eq!(policy.picker.snap_blend, 0.2);
    }

    #[test]
    fn default_validates_clean() {
        assert!(PolicyConfig::default().validate().is_empty());
    }

    #[test]
    fn partial_toml_preserves_defaults() {
        let policy = PolicyConfig::from_toml_str(
            r#"
            [gesture]
            long_press_ms = 400

            [dock]
            max_visible = 6
            "#,
        )
        .unwrap();
        assert_eq!(policy.gesture.long_press_ms, 400);
        assert_eq!(policy.gesture.arm_slop_px, 10.0);
        assert_eq!(policy.dock.max_visible, 6);
        assert_eq!(policy.picker, PickerPolicyConfig::default());
    }

    #[test]
    fn json_loading() {
        let policy = PolicyConfig::from_json_str(r#"{"picker":{"snap_blend":0.5}}"#).unwrap();
        assert_eq!(policy.picker.snap_blend, 0.5);
        assert_eq!(policy.picker.completion_ms, 300);
    }

    #[test]
    fn empty_toml_equals_default() {
        assert_eq!(PolicyConfig::from_toml_str("").unwrap(), PolicyConfig::default());
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let mut policy = PolicyConfig::default();
        policy.gesture.long_press_ms = 0;
        policy.picker.snap_blend = 1.5;
        policy.dock.max_visible = 0;
        policy.picker.wide_columns = 0;
        let errors = policy.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn validated_loader_rejects_bad_values() {
        let err = PolicyConfig::from_toml_str_validated("[dock]\nsnap_blend = -1.0\n").unwrap_err();
        assert!(matches!(err, PolicyConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("dock.snap_blend"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = PolicyConfig::from_toml_str("[gesture\n").unwrap_err();
        assert!(matches!(err, PolicyConfigError::Toml(_)));
    }

    #[test]
    fn toml_round_trip() {
        let text = PolicyConfig::default().to_toml_string().unwrap();
        assert_eq!(PolicyConfig::from_toml_str(&text).unwrap(), PolicyConfig::default());
    }

    #[test]
    fn file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabdeck.toml");
        std::fs::write(&path, "[picker]\ncompletion_ms = 280\n").unwrap();
        assert_eq!(PolicyConfig::from_toml_file(&path).unwrap().picker.completion_ms, 280);
        assert!(matches!(
            PolicyConfig::from_json_file(dir.path().join("missing.json")),
            Err(PolicyConfigError::Io(_))
        ));
    }
}
