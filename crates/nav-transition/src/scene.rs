//! Visual collaborator of the navigation core
//!
//! The core never draws. It pushes derived values to a [`Scene`], which owns
//! the live view tree, the shared title bar, shadows, the status bar and the
//! floating action control. [`RecordingScene`] keeps the latest state of each
//! subsystem plus an event log, for hosts without a toolkit and for tests.

use nav_screen::{Argb, BackButton, Chrome, ScreenId, Title};
use std::collections::HashMap;

// =============================================================================
// Frames
// =============================================================================

/// Stacking position of a newly attached screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// On top of the screens already attached
    Above,
    /// Below the screens already attached
    Below,
}

/// Translation and opacity of a screen's content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTransform {
    /// Horizontal offset
    pub translate_x: f32,
    /// Vertical offset
    pub translate_y: f32,
    /// Opacity
    pub alpha: f32,
}

impl ContentTransform {
    /// Untransformed content
    pub const IDENTITY: ContentTransform = ContentTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        alpha: 1.0,
    };

    /// Horizontal offset only
    pub fn horizontal(translate_x: f32) -> Self {
        Self {
            translate_x,
            ..Self::IDENTITY
        }
    }

    /// Vertical offset only
    pub fn vertical(translate_y: f32) -> Self {
        Self {
            translate_y,
            ..Self::IDENTITY
        }
    }

    /// Opacity only
    pub fn faded(alpha: f32) -> Self {
        Self {
            alpha,
            ..Self::IDENTITY
        }
    }
}

impl Default for ContentTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Shadow along the leading edge of the upper screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeShadow {
    /// Edge position
    pub x: f32,
    /// Opacity
    pub alpha: f32,
}

/// Offset applied to a title while it slides
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shift {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
}

impl Shift {
    /// No offset
    pub const ZERO: Shift = Shift { x: 0.0, y: 0.0 };

    /// This shift multiplied by `factor`
    pub fn scaled(self, factor: f32) -> Shift {
        Shift {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Title cross-fade; `reveal` 0 shows `from`, 1 shows `to`
#[derive(Debug, Clone, PartialEq)]
pub struct TitleFrame {
    /// Disappearing title
    pub from: Title,
    /// Appearing title
    pub to: Title,
    /// Cross-fade position
    pub reveal: f32,
    /// Offset of the disappearing title
    pub from_shift: Shift,
    /// Offset of the appearing title
    pub to_shift: Shift,
}

/// Menu cross-fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuFrame {
    /// Disappearing menu id
    pub from: u32,
    /// Appearing menu id
    pub to: u32,
    /// Cross-fade position
    pub reveal: f32,
}

/// Back button state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackButtonFrame {
    /// Both sides show a button; the icon morphs (menu 0, back 1, close 2)
    Morph {
        /// Morph position
        factor: f32,
    },
    /// Only one side shows a button; it fades along with the title
    Fade {
        /// Icon
        kind: BackButton,
        /// Opacity
        alpha: f32,
        /// Offset, matching its title
        shift: Shift,
    },
}

/// Floating action control state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatingActionFrame {
    /// Both sides use the control; the icon swaps
    Swap {
        /// Disappearing icon
        from: u32,
        /// Appearing icon
        to: u32,
        /// Swap position
        reveal: f32,
    },
    /// Only one side uses the control; it scales in or out
    Scale {
        /// Icon
        icon: u32,
        /// Scale, 0 meaning hidden
        scale: f32,
    },
    /// At rest; icon 0 hides the control
    Settled {
        /// Icon
        icon: u32,
    },
}

impl FloatingActionFrame {
    /// Rest state for `chrome`
    pub fn settled(chrome: &Chrome) -> Self {
        FloatingActionFrame::Settled {
            icon: chrome.floating_action,
        }
    }
}

/// Intermediate title bar state.
///
/// Only subsystems that differ between the two sides are set; `None` fields
/// must be left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderFrame {
    /// Title cross-fade
    pub title: Option<TitleFrame>,
    /// Menu cross-fade
    pub menu: Option<MenuFrame>,
    /// Back button
    pub back_button: Option<BackButtonFrame>,
    /// Title bar height
    pub height: Option<f32>,
    /// Title bar background
    pub header_color: Option<Argb>,
    /// Title text color
    pub text_color: Option<Argb>,
    /// Icon color
    pub icon_color: Option<Argb>,
    /// Drop shadow opacity
    pub shadow_alpha: Option<f32>,
    /// Player bar allowance, 1 meaning room is kept
    pub player_allowance: Option<f32>,
}

impl HeaderFrame {
    /// Whether the frame drives nothing
    pub fn is_empty(&self) -> bool {
        *self == HeaderFrame::default()
    }
}

// =============================================================================
// Scene
// =============================================================================

/// Receives every visual change the navigation core derives
#[cfg_attr(test, mockall::automock)]
pub trait Scene {
    /// Add a screen's content to the live tree
    fn attach(&mut self, id: &ScreenId, placement: Placement);

    /// Remove a screen's content from the live tree
    fn detach(&mut self, id: &ScreenId);

    /// Move or fade a screen's content
    fn set_content(&mut self, id: &ScreenId, transform: ContentTransform);

    /// Dim a screen's content
    fn set_dim(&mut self, id: &ScreenId, alpha: f32);

    /// Show or hide the edge shadow
    fn set_edge_shadow(&mut self, shadow: Option<EdgeShadow>);

    /// Apply an intermediate title bar state
    fn set_header(&mut self, frame: &HeaderFrame);

    /// Show `chrome` in the title bar at rest
    fn settle_header(&mut self, chrome: &Chrome);

    /// Update the floating action control
    fn set_floating_action(&mut self, frame: FloatingActionFrame);

    /// Color behind the status bar
    fn set_status_bar(&mut self, color: Argb);
}

// =============================================================================
// Recording Scene
// =============================================================================

/// One call received by a [`RecordingScene`]
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// `attach`
    Attach(ScreenId, Placement),
    /// `detach`
    Detach(ScreenId),
    /// `set_content`
    Content(ScreenId, ContentTransform),
    /// `set_dim`
    Dim(ScreenId, f32),
    /// `set_edge_shadow`
    EdgeShadow(Option<EdgeShadow>),
    /// `set_header`
    Header(HeaderFrame),
    /// `settle_header`
    SettleHeader(Chrome),
    /// `set_floating_action`
    FloatingAction(FloatingActionFrame),
    /// `set_status_bar`
    StatusBar(Argb),
}

/// Scene that remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingScene {
    events: Vec<SceneEvent>,
    attached: Vec<ScreenId>,
    content: HashMap<ScreenId, ContentTransform>,
    dim: HashMap<ScreenId, f32>,
    edge_shadow: Option<EdgeShadow>,
    header: Option<HeaderFrame>,
    settled: Option<Chrome>,
    floating_action: Option<FloatingActionFrame>,
    status_bar: Option<Argb>,
}

impl RecordingScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Take the event log, leaving it empty
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Attached screens, bottom to top
    pub fn attached(&self) -> &[ScreenId] {
        &self.attached
    }

    /// Whether `id` is attached
    pub fn is_attached(&self, id: &ScreenId) -> bool {
        self.attached.contains(id)
    }

    /// Latest content transform of `id`
    pub fn content(&self, id: &ScreenId) -> Option<ContentTransform> {
        self.content.get(id).copied()
    }

    /// Latest dim of `id`
    pub fn dim(&self, id: &ScreenId) -> Option<f32> {
        self.dim.get(id).copied()
    }

    /// Current edge shadow
    pub fn edge_shadow(&self) -> Option<EdgeShadow> {
        self.edge_shadow
    }

    /// Latest intermediate title bar state, cleared when the header settles
    pub fn header(&self) -> Option<&HeaderFrame> {
        self.header.as_ref()
    }

    /// Chrome of the last settled title bar
    pub fn settled_header(&self) -> Option<&Chrome> {
        self.settled.as_ref()
    }

    /// Latest floating action state
    pub fn floating_action(&self) -> Option<FloatingActionFrame> {
        self.floating_action
    }

    /// Latest status bar color
    pub fn status_bar(&self) -> Option<Argb> {
        self.status_bar
    }
}

impl Scene for RecordingScene {
    fn attach(&mut self, id: &ScreenId, placement: Placement) {
        self.events.push(SceneEvent::Attach(id.clone(), placement));
        self.attached.retain(|attached| attached != id);
        match placement {
            Placement::Above => self.attached.push(id.clone()),
            Placement::Below => self.attached.insert(0, id.clone()),
        }
    }

    fn detach(&mut self, id: &ScreenId) {
        self.events.push(SceneEvent::Detach(id.clone()));
        self.attached.retain(|attached| attached != id);
        self.content.remove(id);
        self.dim.remove(id);
    }

    fn set_content(&mut self, id: &ScreenId, transform: ContentTransform) {
        self.events.push(SceneEvent::Content(id.clone(), transform));
        self.content.insert(id.clone(), transform);
    }

    fn set_dim(&mut self, id: &ScreenId, alpha: f32) {
        self.events.push(SceneEvent::Dim(id.clone(), alpha));
        self.dim.insert(id.clone(), alpha);
    }

    fn set_edge_shadow(&mut self, shadow: Option<EdgeShadow>) {
        self.events.push(SceneEvent::EdgeShadow(shadow));
        self.edge_shadow = shadow;
    }

    fn set_header(&mut self, frame: &HeaderFrame) {
        self.events.push(SceneEvent::Header(frame.clone()));
        self.header = Some(frame.clone());
    }

    fn settle_header(&mut self, chrome: &Chrome) {
        self.events.push(SceneEvent::SettleHeader(chrome.clone()));
        self.header = None;
        self.settled = Some(chrome.clone());
    }

    fn set_floating_action(&mut self, frame: FloatingActionFrame) {
        self.events.push(SceneEvent::FloatingAction(frame));
        self.floating_action = Some(frame);
    }

    fn set_status_bar(&mut self, color: Argb) {
        self.events.push(SceneEvent::StatusBar(color));
        self.status_bar = Some(color);
    }
}
