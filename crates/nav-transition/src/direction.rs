//! Transition directions and their timing

use crate::driver::Curve;
use crate::settings::NavigationSettings;
use nav_screen::TransitionHints;
use serde::{Deserialize, Serialize};

/// How content moves during a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// No content movement or opacity change
    #[default]
    None,
    /// Cross-fade
    Fade,
    /// Slide along the x axis, with parallax on the lower screen
    Horizontal,
    /// Slide along the y axis, for popup-style screens
    Vertical,
}

impl Direction {
    /// Direction for showing or hiding a screen.
    ///
    /// `hints` and `popup` describe the screen that moves: the incoming one
    /// when navigating forward, the outgoing one when navigating back.
    pub fn select(
        hints: &TransitionHints,
        popup: bool,
        force_fade: bool,
        settings: &NavigationSettings,
    ) -> Direction {
        let direction = if force_fade || hints.force_fade || hints.fast {
            Direction::Fade
        } else if popup {
            Direction::Vertical
        } else {
            Direction::Horizontal
        };
        if direction == Direction::Horizontal && settings.reduce_motion {
            Direction::Fade
        } else {
            direction
        }
    }

    /// Animation length
    pub fn duration_ms(self, forward: bool, fast: bool, settings: &NavigationSettings) -> u32 {
        let durations = &settings.durations;
        match self {
            Direction::None => 0,
            Direction::Fade if fast => durations.fade_fast,
            Direction::Fade => durations.fade,
            Direction::Horizontal => durations.horizontal,
            Direction::Vertical if forward => durations.vertical_forward,
            Direction::Vertical => durations.vertical_backward,
        }
    }

    /// Interpolation shape
    pub fn curve(self) -> Curve {
        match self {
            Direction::None => Curve::Linear,
            Direction::Fade => Curve::DECELERATE,
            Direction::Horizontal | Direction::Vertical => Curve::NAVIGATION,
        }
    }

    /// Whether content moves at all
    pub fn is_animated(self) -> bool {
        self != Direction::None
    }
}

/// Delay before a transition starts moving.
///
/// Fast transitions start at once; covering or uncovering a popup-style screen
/// waits for the popup delay; otherwise the moving screen's own delay applies.
pub fn start_delay(
    hints: &TransitionHints,
    popup_involved: bool,
    settings: &NavigationSettings,
) -> u32 {
    if hints.fast {
        0
    } else if popup_involved {
        settings.durations.popup_start_delay
    } else {
        hints.start_delay_ms
    }
}
