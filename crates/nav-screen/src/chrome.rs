//! Declared title bar chrome
//!
//! A screen describes its title bar once, as a [`Chrome`] value, instead of
//! answering a long list of individual questions. Two descriptors are compared
//! with [`Chrome::diff`] to decide which chrome subsystems a transition has to
//! drive; subsystems whose values are equal on both sides are left untouched.

use crate::color::Argb;
use crate::tokens::{header, status_bar};
use serde::{Deserialize, Serialize};

// =============================================================================
// Back Button
// =============================================================================

/// Icon shown in the back button slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackButton {
    /// No button
    #[default]
    None,
    /// Drawer (hamburger) icon
    Menu,
    /// Back arrow
    Back,
    /// Close cross
    Close,
}

impl BackButton {
    /// Morph position of the icon, `None` when no button is shown.
    ///
    /// The icon morphs continuously menu (0) -> back (1) -> close (2).
    pub fn morph_factor(self) -> Option<f32> {
        match self {
            BackButton::None => None,
            BackButton::Menu => Some(0.0),
            BackButton::Back => Some(1.0),
            BackButton::Close => Some(2.0),
        }
    }

    /// Whether a button is shown at all
    pub fn is_visible(self) -> bool {
        self != BackButton::None
    }
}

// =============================================================================
// Title
// =============================================================================

/// Content of the title slot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Title {
    /// Empty title
    #[default]
    None,
    /// Plain text title
    Text(String),
    /// Selection counter
    Counter(usize),
    /// Search input with a hint
    SearchField(String),
    /// Screen-provided view, identified by a key
    Custom(String),
}

// =============================================================================
// Mode Colors
// =============================================================================

/// Colors used while a screen is in a select or search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeColors {
    /// Title bar background
    pub header: Argb,
    /// Title text
    pub text: Argb,
    /// Icons, including the back button
    pub icon: Argb,
}

// =============================================================================
// Chrome
// =============================================================================

/// Everything the navigation core needs to know about a screen's title bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chrome {
    /// Title slot content
    pub title: Title,
    /// Back button icon
    pub back_button: BackButton,
    /// Menu (action button set) id, 0 for none
    pub menu: u32,
    /// Portrait title bar height
    pub header_height: f32,
    /// Expanded title bar height, replacing the portrait one while set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_header_height: Option<f32>,
    /// Title bar background
    pub header_color: Argb,
    /// Title text color
    pub text_color: Argb,
    /// Icon color
    pub icon_color: Argb,
    /// Overlay drawn over the header color behind the status bar
    pub status_bar: Argb,
    /// Floating action icon id, 0 for none
    pub floating_action: u32,
    /// Draw a drop shadow under the title bar
    pub drop_shadow: bool,
    /// Leave room for the media player bar
    pub player_bar: bool,
    /// Popup-style (sheet) screen
    pub popup: bool,
    /// Colors while in select mode, defaults to the plain colors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_colors: Option<ModeColors>,
    /// Colors while in search mode, defaults to the plain colors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_colors: Option<ModeColors>,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            title: Title::None,
            back_button: BackButton::None,
            menu: 0,
            header_height: header::PORTRAIT_HEIGHT,
            expanded_header_height: None,
            header_color: Argb::rgb(0x1E, 0x3A, 0x5F),
            text_color: Argb::WHITE,
            icon_color: Argb::WHITE,
            status_bar: status_bar::DEFAULT_OVERLAY,
            floating_action: 0,
            drop_shadow: true,
            player_bar: false,
            popup: false,
            select_colors: None,
            search_colors: None,
        }
    }
}

impl Chrome {
    /// Chrome with a text title and a back arrow
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Title::Text(title.into()),
            back_button: BackButton::Back,
            ..Self::default()
        }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: Title) -> Self {
        self.title = title;
        self
    }

    /// Set the back button
    #[must_use]
    pub fn with_back_button(mut self, back_button: BackButton) -> Self {
        self.back_button = back_button;
        self
    }

    /// Set the menu id
    #[must_use]
    pub fn with_menu(mut self, menu: u32) -> Self {
        self.menu = menu;
        self
    }

    /// Set the title bar height
    #[must_use]
    pub fn with_header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    /// Show the title bar expanded to `height`
    #[must_use]
    pub fn with_expanded_header(mut self, height: f32) -> Self {
        self.expanded_header_height = Some(height);
        self
    }

    /// Show the title bar expanded to the standard expanded height
    #[must_use]
    pub fn expanded(self) -> Self {
        self.with_expanded_header(header::EXPANDED_HEIGHT)
    }

    /// Height the title bar is drawn at
    pub fn title_bar_height(&self) -> f32 {
        self.expanded_header_height.unwrap_or(self.header_height)
    }

    /// Set the header, text and icon colors
    #[must_use]
    pub fn with_colors(mut self, header: Argb, text: Argb, icon: Argb) -> Self {
        self.header_color = header;
        self.text_color = text;
        self.icon_color = icon;
        self
    }

    /// Set the status bar overlay
    #[must_use]
    pub fn with_status_bar(mut self, overlay: Argb) -> Self {
        self.status_bar = overlay;
        self
    }

    /// Set the floating action icon
    #[must_use]
    pub fn with_floating_action(mut self, icon: u32) -> Self {
        self.floating_action = icon;
        self
    }

    /// Toggle the drop shadow
    #[must_use]
    pub fn with_drop_shadow(mut self, drop_shadow: bool) -> Self {
        self.drop_shadow = drop_shadow;
        self
    }

    /// Toggle the player bar allowance
    #[must_use]
    pub fn with_player_bar(mut self, player_bar: bool) -> Self {
        self.player_bar = player_bar;
        self
    }

    /// Mark as popup-style
    #[must_use]
    pub fn as_popup(mut self) -> Self {
        self.popup = true;
        self
    }

    /// Colors used in select mode
    #[must_use]
    pub fn with_select_colors(mut self, colors: ModeColors) -> Self {
        self.select_colors = Some(colors);
        self
    }

    /// Colors used in search mode
    #[must_use]
    pub fn with_search_colors(mut self, colors: ModeColors) -> Self {
        self.search_colors = Some(colors);
        self
    }

    /// Color shown behind the status bar
    pub fn status_bar_color(&self) -> Argb {
        self.header_color.composite(self.status_bar)
    }

    /// Plain colors as a [`ModeColors`]
    pub fn colors(&self) -> ModeColors {
        ModeColors {
            header: self.header_color,
            text: self.text_color,
            icon: self.icon_color,
        }
    }

    /// Replace the header, text and icon colors
    pub fn apply_colors(&mut self, colors: ModeColors) {
        self.header_color = colors.header;
        self.text_color = colors.text;
        self.icon_color = colors.icon;
    }

    /// Compare with the chrome on the other side of a transition
    pub fn diff(&self, other: &Chrome) -> ChromeDiff {
        ChromeDiff {
            title: self.title != other.title,
            back_button: self.back_button != other.back_button,
            menu: self.menu != other.menu,
            height: (self.title_bar_height() - other.title_bar_height()).abs() > f32::EPSILON,
            header_color: self.header_color != other.header_color,
            text_color: self.text_color != other.text_color,
            icon_color: self.icon_color != other.icon_color,
            status_bar: self.status_bar_color() != other.status_bar_color(),
            floating_action: self.floating_action != other.floating_action,
            drop_shadow: self.drop_shadow != other.drop_shadow,
            player_bar: self.player_bar != other.player_bar,
        }
    }
}

// =============================================================================
// Chrome Diff
// =============================================================================

/// Which chrome subsystems differ between two descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeDiff {
    /// Title slot content
    pub title: bool,
    /// Back button icon
    pub back_button: bool,
    /// Menu id
    pub menu: bool,
    /// Title bar height
    pub height: bool,
    /// Title bar background
    pub header_color: bool,
    /// Title text color
    pub text_color: bool,
    /// Icon color
    pub icon_color: bool,
    /// Resolved status bar color
    pub status_bar: bool,
    /// Floating action icon
    pub floating_action: bool,
    /// Drop shadow flag
    pub drop_shadow: bool,
    /// Player bar allowance
    pub player_bar: bool,
}

impl ChromeDiff {
    /// Nothing differs
    pub fn is_empty(&self) -> bool {
        !self.any_header() && !self.floating_action && !self.status_bar
    }

    /// Anything drawn by the title bar differs
    pub fn any_header(&self) -> bool {
        self.title
            || self.back_button
            || self.menu
            || self.height
            || self.any_color()
            || self.drop_shadow
            || self.player_bar
    }

    /// Any of the three title bar colors differs
    pub fn any_color(&self) -> bool {
        self.header_color || self.text_color || self.icon_color
    }
}
