//! Navigation settings
//!
//! Every value defaults to the design tokens, so an empty JSON object is a
//! complete configuration. Settings are read from JSON with
//! [`NavigationSettings::from_json`] or [`NavigationSettings::load`], both of
//! which validate the result.

use crate::error::SettingsError;
use nav_screen::tokens::{content, duration, header, peek, shadow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

// =============================================================================
// Sections
// =============================================================================

/// Transition durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DurationSettings {
    /// Horizontal slide
    pub horizontal: u32,
    /// Vertical sheet opening
    pub vertical_forward: u32,
    /// Vertical sheet closing
    pub vertical_backward: u32,
    /// Cross-fade
    pub fade: u32,
    /// Cross-fade of fast transitions
    pub fade_fast: u32,
    /// Start delay when a popup-style screen is covered or uncovered
    pub popup_start_delay: u32,
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            horizontal: duration::HORIZONTAL,
            vertical_forward: duration::VERTICAL_FORWARD,
            vertical_backward: duration::VERTICAL_BACKWARD,
            fade: duration::FADE,
            fade_fast: duration::FADE_FAST,
            popup_start_delay: duration::POPUP_START_DELAY,
        }
    }
}

/// Bounds of the animation that finishes a released peek
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropSettings {
    /// Shortest horizontal drop
    pub min: u32,
    /// Longest horizontal drop
    pub max: u32,
    /// Shortest vertical drop
    pub vertical_min: u32,
    /// Longest vertical drop
    pub vertical_max: u32,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            min: duration::DROP_MIN,
            max: duration::DROP_MAX,
            vertical_min: duration::VERTICAL_DROP_MIN,
            vertical_max: duration::VERTICAL_DROP_MAX,
        }
    }
}

/// Peek release thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeekSettings {
    /// Revealed fraction past which a slow release commits
    pub commit_threshold: f32,
    /// Release velocity (px/s) that decides the outcome by itself
    pub fling_velocity: f32,
}

impl Default for PeekSettings {
    fn default() -> Self {
        Self {
            commit_threshold: peek::COMMIT_THRESHOLD,
            fling_velocity: peek::FLING_VELOCITY,
        }
    }
}

/// Waiting for asynchronously prepared screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsyncStartSettings {
    /// Longest wait
    pub timeout: u32,
    /// Longest wait when the transition is fast
    pub fast_timeout: u32,
}

impl Default for AsyncStartSettings {
    fn default() -> Self {
        Self {
            timeout: duration::ASYNC_START_TIMEOUT,
            fast_timeout: duration::ASYNC_START_TIMEOUT_FAST,
        }
    }
}

/// Geometry used by the cross-fade laws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    /// Portrait title bar height
    pub header_height: f32,
    /// Expanded title bar height
    pub expanded_header_height: f32,
    /// Horizontal title shift as a fraction of the width
    pub title_shift_factor: f32,
    /// The lower screen moves by `width / parallax_divisor`
    pub parallax_divisor: f32,
    /// Dim over a fully covered lower screen
    pub dim_max: f32,
    /// Edge shadow width
    pub edge_shadow_width: f32,
    /// Title bar drop shadow height
    pub top_shadow_height: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            header_height: header::PORTRAIT_HEIGHT,
            expanded_header_height: header::EXPANDED_HEIGHT,
            title_shift_factor: header::TITLE_SHIFT_FACTOR,
            parallax_divisor: content::PARALLAX_DIVISOR,
            dim_max: content::DIM_MAX,
            edge_shadow_width: shadow::EDGE_WIDTH,
            top_shadow_height: shadow::TOP_HEIGHT,
        }
    }
}

// =============================================================================
// Navigation Settings
// =============================================================================

/// All navigation settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSettings {
    /// Replace horizontal slides with cross-fades
    #[serde(default)]
    pub reduce_motion: bool,

    /// Mirror horizontal motion
    #[serde(default)]
    pub rtl: bool,

    /// Transition durations
    #[serde(default)]
    pub durations: DurationSettings,

    /// Peek drop bounds
    #[serde(default)]
    pub drop: DropSettings,

    /// Peek thresholds
    #[serde(default)]
    pub peek: PeekSettings,

    /// Asynchronous start timeouts
    #[serde(default)]
    pub async_start: AsyncStartSettings,

    /// Geometry
    #[serde(default)]
    pub layout: LayoutSettings,
}

impl NavigationSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded navigation settings");
        Ok(settings)
    }

    /// Check that every value is in range
    pub fn validate(&self) -> Result<()> {
        let threshold = self.peek.commit_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(SettingsError::Invalid(format!(
                "peek.commitThreshold must be in (0, 1), got {}",
                threshold
            )));
        }
        if self.peek.fling_velocity <= 0.0 {
            return Err(SettingsError::Invalid(
                "peek.flingVelocity must be positive".to_string(),
            ));
        }
        if self.drop.min > self.drop.max {
            return Err(SettingsError::Invalid(format!(
                "drop.min ({}) exceeds drop.max ({})",
                self.drop.min, self.drop.max
            )));
        }
        if self.drop.vertical_min > self.drop.vertical_max {
            return Err(SettingsError::Invalid(format!(
                "drop.verticalMin ({}) exceeds drop.verticalMax ({})",
                self.drop.vertical_min, self.drop.vertical_max
            )));
        }
        let layout = &self.layout;
        let sizes = [
            ("layout.headerHeight", layout.header_height),
            ("layout.expandedHeaderHeight", layout.expanded_header_height),
            ("layout.parallaxDivisor", layout.parallax_divisor),
            ("layout.edgeShadowWidth", layout.edge_shadow_width),
            ("layout.topShadowHeight", layout.top_shadow_height),
        ];
        for (name, value) in sizes {
            if value <= 0.0 {
                return Err(SettingsError::Invalid(format!("{} must be positive", name)));
            }
        }
        if !(0.0..=1.0).contains(&layout.dim_max) {
            return Err(SettingsError::Invalid(
                "layout.dimMax must be in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&layout.title_shift_factor) {
            return Err(SettingsError::Invalid(
                "layout.titleShiftFactor must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Drop duration bounds for a horizontal or vertical peek
    pub fn drop_bounds(&self, vertical: bool) -> (u32, u32) {
        if vertical {
            (self.drop.vertical_min, self.drop.vertical_max)
        } else {
            (self.drop.min, self.drop.max)
        }
    }

    /// Async start timeout for a fast or regular transition
    pub fn async_timeout(&self, fast: bool) -> u32 {
        if fast {
            self.async_start.fast_timeout
        } else {
            self.async_start.timeout
        }
    }
}
