//! Design tokens for navigation chrome and transitions
//!
//! Sizes are in density-independent pixels, durations in milliseconds and
//! factors in the `[0, 1]` range unless stated otherwise. Settings defaults are
//! derived from these values.

// =============================================================================
// Header Tokens
// =============================================================================

/// Title bar geometry
pub mod header {
    /// Portrait title bar height (56px)
    pub const PORTRAIT_HEIGHT: f32 = 56.0;
    /// Expanded title bar height (156px)
    pub const EXPANDED_HEIGHT: f32 = 156.0;
    /// Horizontal title shift, as a fraction of the viewport width
    pub const TITLE_SHIFT_FACTOR: f32 = 0.14;
    /// Vertical title shift, as a fraction of the header height
    pub const VERTICAL_SHIFT_FACTOR: f32 = 0.28;
    /// Duration of a title bar mode transform
    pub const MODE_TRANSFORM_DURATION: u32 = 200;
}

// =============================================================================
// Shadow Tokens
// =============================================================================

/// Edge and top shadows
pub mod shadow {
    /// Edge shadow width (7px)
    pub const EDGE_WIDTH: f32 = 7.0;
    /// Title bar drop shadow height (7px)
    pub const TOP_HEIGHT: f32 = 7.0;
    /// Edge shadow alpha while the upper screen covers the lower one entirely
    pub const EDGE_ALPHA_BASE: f32 = 0.65;
    /// Edge shadow alpha added as the upper screen slides in
    pub const EDGE_ALPHA_RANGE: f32 = 0.35;
}

// =============================================================================
// Content Tokens
// =============================================================================

/// Lower-screen treatment during horizontal transitions
pub mod content {
    /// Dim applied to the lower screen when fully covered
    pub const DIM_MAX: f32 = 0.08;
    /// The lower screen moves by `1 / PARALLAX_DIVISOR` of the viewport width
    pub const PARALLAX_DIVISOR: f32 = 3.0;
}

// =============================================================================
// Status Bar Tokens
// =============================================================================

/// Status bar tint
pub mod status_bar {
    use crate::color::Argb;

    /// Default overlay drawn over the header color
    pub const DEFAULT_OVERLAY: Argb = Argb(0x4C00_0000);
    /// Lighter overlay for light headers
    pub const LIGHT_OVERLAY: Argb = Argb(0x3300_0000);
}

// =============================================================================
// Motion Tokens
// =============================================================================

/// Animation durations in milliseconds
pub mod duration {
    /// Instant (0ms)
    pub const INSTANT: u32 = 0;
    /// Fast fade, used by forced-fast transitions (120ms)
    pub const FADE_FAST: u32 = 120;
    /// Fade (180ms)
    pub const FADE: u32 = 180;
    /// Horizontal slide (400ms)
    pub const HORIZONTAL: u32 = 400;
    /// Vertical sheet, opening (400ms)
    pub const VERTICAL_FORWARD: u32 = 400;
    /// Vertical sheet, closing (500ms)
    pub const VERTICAL_BACKWARD: u32 = 500;
    /// Start delay when a popup-style screen is involved (120ms)
    pub const POPUP_START_DELAY: u32 = 120;
    /// Shortest drop after a horizontal peek release (60ms)
    pub const DROP_MIN: u32 = 60;
    /// Longest drop after a horizontal peek release (200ms)
    pub const DROP_MAX: u32 = 200;
    /// Shortest drop after a vertical peek release (160ms)
    pub const VERTICAL_DROP_MIN: u32 = 160;
    /// Longest drop after a vertical peek release (300ms)
    pub const VERTICAL_DROP_MAX: u32 = 300;
    /// Time to wait for an asynchronously prepared screen (500ms)
    pub const ASYNC_START_TIMEOUT: u32 = 500;
    /// Time to wait when the transition is fast (2000ms)
    pub const ASYNC_START_TIMEOUT_FAST: u32 = 2000;
}

/// Easing curves as cubic-bezier control points `(x1, y1, x2, y2)`
pub mod easing {
    /// Navigation slide curve
    pub const NAVIGATION: (f32, f32, f32, f32) = (0.4, 0.0, 0.2, 1.0);
    /// Decelerate curve, used for fades and title bar transforms
    pub const DECELERATE: (f32, f32, f32, f32) = (0.0, 0.0, 0.2, 1.0);
    /// Linear
    pub const LINEAR: (f32, f32, f32, f32) = (0.0, 0.0, 1.0, 1.0);
}

// =============================================================================
// Gesture Tokens
// =============================================================================

/// Peek gesture thresholds
pub mod peek {
    /// Fraction of the extent past which a slow release commits
    pub const COMMIT_THRESHOLD: f32 = 0.4;
    /// Release velocity (px/s) that decides the outcome by itself
    pub const FLING_VELOCITY: f32 = 1000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_bounds_are_ordered() {
        assert!(duration::DROP_MIN < duration::DROP_MAX);
        assert!(duration::VERTICAL_DROP_MIN < duration::VERTICAL_DROP_MAX);
    }

    #[test]
    fn test_header_heights() {
        assert!(header::EXPANDED_HEIGHT > header::PORTRAIT_HEIGHT);
    }

    #[test]
    fn test_peek_threshold_in_range() {
        assert!(peek::COMMIT_THRESHOLD > 0.0 && peek::COMMIT_THRESHOLD < 1.0);
    }
}
