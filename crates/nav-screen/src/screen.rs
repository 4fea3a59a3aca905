//! Screen capability contract
//!
//! This module provides what the navigation core needs from a screen:
//! - Stable identity ([`ScreenId`])
//! - Declared chrome, per transform mode ([`Chrome`], [`ModeState`])
//! - Lifecycle hooks (prepare, attach, focus, blur, detach, destroy)
//! - Title bar mode hooks used by the title bar transform
//! - Asynchronous readiness ([`Readiness`], [`ReadyToken`])
//!
//! Every hook has a no-op default so a screen only implements what it uses.

use crate::chrome::{BackButton, Chrome, Title};
use crate::tokens::header;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Identity
// =============================================================================

/// Stable screen identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    /// Create an id from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a random unique id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// Transform Modes
// =============================================================================

/// Title bar transform modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Multi-selection
    Select,
    /// In-place search
    Search,
    /// Screen-defined mode
    Custom,
}

/// Current title bar mode of a screen.
///
/// A single value instead of three flags, so two modes can never be active at
/// the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ModeState {
    /// Normal title
    #[default]
    Normal,
    /// Selecting items
    Select {
        /// Number of selected items
        count: usize,
    },
    /// Searching
    Search,
    /// Screen-defined mode
    Custom,
}

impl ModeState {
    /// Initial state for a mode
    pub fn entering(mode: TransformMode, initial_count: usize) -> Self {
        match mode {
            TransformMode::Select => ModeState::Select {
                count: initial_count,
            },
            TransformMode::Search => ModeState::Search,
            TransformMode::Custom => ModeState::Custom,
        }
    }

    /// The active mode, if any
    pub fn mode(&self) -> Option<TransformMode> {
        match self {
            ModeState::Normal => None,
            ModeState::Select { .. } => Some(TransformMode::Select),
            ModeState::Search => Some(TransformMode::Search),
            ModeState::Custom => Some(TransformMode::Custom),
        }
    }

    /// Any mode is active
    pub fn is_transformed(&self) -> bool {
        !matches!(self, ModeState::Normal)
    }

    /// In select mode
    pub fn in_select_mode(&self) -> bool {
        matches!(self, ModeState::Select { .. })
    }

    /// In search mode
    pub fn in_search_mode(&self) -> bool {
        matches!(self, ModeState::Search)
    }

    /// In custom mode
    pub fn in_custom_mode(&self) -> bool {
        matches!(self, ModeState::Custom)
    }

    /// Selected item count while selecting
    pub fn selected_count(&self) -> Option<usize> {
        match self {
            ModeState::Select { count } => Some(*count),
            _ => None,
        }
    }
}

/// Chrome a screen shows in `mode`, derived from its plain chrome.
///
/// Select mode shows a counter and a close button, search mode a search field
/// and a close button without menu, custom mode keeps the title with a back
/// arrow and no menu.
pub fn default_mode_chrome(base: &Chrome, mode: &ModeState) -> Chrome {
    let mut chrome = base.clone();
    match mode {
        ModeState::Normal => {}
        ModeState::Select { count } => {
            chrome.title = Title::Counter(*count);
            chrome.back_button = BackButton::Close;
            if let Some(colors) = base.select_colors {
                chrome.apply_colors(colors);
            }
        }
        ModeState::Search => {
            chrome.title = Title::SearchField(String::new());
            chrome.back_button = BackButton::Close;
            chrome.menu = 0;
            if let Some(colors) = base.search_colors {
                chrome.apply_colors(colors);
            }
        }
        ModeState::Custom => {
            chrome.back_button = BackButton::Back;
            chrome.menu = 0;
        }
    }
    chrome
}

// =============================================================================
// Transition Hints
// =============================================================================

/// How a screen prefers to be shown or hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionHints {
    /// Always cross-fade
    pub force_fade: bool,
    /// Short fade without start delay
    pub fast: bool,
    /// Delay before the animation starts
    pub start_delay_ms: u32,
}

// =============================================================================
// Readiness
// =============================================================================

/// Whether a screen can be animated in right away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Ready now
    #[default]
    Immediate,
    /// Needs asynchronous preparation
    Deferred {
        /// Longest wait, settings default when `None`
        timeout_ms: Option<u32>,
    },
}

/// Identifies one scheduled transition start.
///
/// Signalling a token that no longer matches the scheduled start is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadyToken(Uuid);

impl ReadyToken {
    /// Create a fresh token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReadyToken {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Screen
// =============================================================================

/// A navigable unit of content
pub trait Screen {
    /// Stable identity
    fn id(&self) -> &ScreenId;

    /// Declared chrome in the normal mode
    fn chrome(&self) -> Chrome;

    /// Declared chrome in `mode`
    fn mode_chrome(&self, mode: &ModeState) -> Chrome {
        default_mode_chrome(&self.chrome(), mode)
    }

    /// Transition preferences
    fn transition_hints(&self) -> TransitionHints {
        TransitionHints::default()
    }

    /// Whether the screen must be prepared before it is animated in
    fn readiness(&self, _fast: bool) -> Readiness {
        Readiness::Immediate
    }

    /// Start asynchronous preparation; report back with the token
    fn on_ready_requested(&mut self, _token: ReadyToken) {}

    /// About to become visible
    fn on_prepare_to_show(&mut self) {}

    /// Added to the live view tree
    fn on_attach(&mut self) {}

    /// Removed from the live view tree
    fn on_detach(&mut self) {}

    /// Became the focused screen
    fn on_focus(&mut self) {}

    /// Lost focus
    fn on_blur(&mut self) {}

    /// Destroyed; called once
    fn on_destroy(&mut self) {}

    /// Handle a back press; `true` when consumed
    fn on_back_pressed(&mut self) -> bool {
        false
    }

    /// A back press in search mode; `false` keeps the search open
    fn close_search_on_back(&mut self) -> bool {
        true
    }

    /// Entering a title bar mode
    fn on_enter_mode(&mut self, _mode: &ModeState) {}

    /// Left a title bar mode
    fn on_leave_mode(&mut self, _mode: TransformMode) {}

    /// Title bar transform progress, 1 meaning fully transformed
    fn apply_mode_factor(&mut self, _mode: TransformMode, _factor: f32, _opening: bool) {}

    /// Duration of the title bar transform
    fn mode_transform_duration_ms(&self, _mode: TransformMode) -> u32 {
        header::MODE_TRANSFORM_DURATION
    }
}

impl fmt::Debug for dyn Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen").field("id", self.id()).finish()
    }
}
