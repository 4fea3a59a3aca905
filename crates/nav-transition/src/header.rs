//! Title bar cross-fade plans
//!
//! A [`HeaderPlan`] is computed once per transition from the chrome on both
//! sides. It records which subsystems need switching and turns a reveal factor
//! into a [`HeaderFrame`] that drives only those subsystems. Stack transitions
//! and title bar mode transforms share it.

use crate::scene::{BackButtonFrame, FloatingActionFrame, HeaderFrame, MenuFrame, Shift, TitleFrame};
use nav_screen::{Argb, BackButton, Chrome, ChromeDiff};

/// How the back button changes
#[derive(Debug, Clone, Copy, PartialEq)]
enum BackPlan {
    Static,
    Morph { from: f32, to: f32 },
    FadeOut(BackButton),
    FadeIn(BackButton),
}

/// How the floating action control changes
#[derive(Debug, Clone, Copy, PartialEq)]
enum FloatPlan {
    Static,
    IconSwap { from: u32, to: u32 },
    ScaleOut(u32),
    ScaleIn(u32),
}

/// Which title bar subsystems to drive between two chrome descriptors
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPlan {
    from: Chrome,
    to: Chrome,
    diff: ChromeDiff,
    back: BackPlan,
    floating: FloatPlan,
    shift: Shift,
}

impl HeaderPlan {
    /// Plan a cross-fade from `from` (reveal 0) to `to` (reveal 1).
    ///
    /// `shift` is how far the titles slide; [`Shift::ZERO`] cross-fades in
    /// place.
    pub fn between(from: &Chrome, to: &Chrome, shift: Shift) -> Self {
        let diff = from.diff(to);

        let back = if !diff.back_button {
            BackPlan::Static
        } else {
            match (from.back_button.morph_factor(), to.back_button.morph_factor()) {
                (Some(from), Some(to)) => BackPlan::Morph { from, to },
                (Some(_), None) => BackPlan::FadeOut(from.back_button),
                (None, Some(_)) => BackPlan::FadeIn(to.back_button),
                (None, None) => BackPlan::Static,
            }
        };

        let floating = if !diff.floating_action {
            FloatPlan::Static
        } else {
            match (from.floating_action, to.floating_action) {
                (0, icon) => FloatPlan::ScaleIn(icon),
                (icon, 0) => FloatPlan::ScaleOut(icon),
                (from, to) => FloatPlan::IconSwap { from, to },
            }
        };

        Self {
            from: from.clone(),
            to: to.clone(),
            diff,
            back,
            floating,
            shift,
        }
    }

    /// Chrome shown at reveal 0
    pub fn from(&self) -> &Chrome {
        &self.from
    }

    /// Chrome shown at reveal 1
    pub fn to(&self) -> &Chrome {
        &self.to
    }

    /// Subsystems that differ
    pub fn diff(&self) -> &ChromeDiff {
        &self.diff
    }

    /// Whether the title bar needs driving at all
    pub fn drives_header(&self) -> bool {
        self.diff.any_header()
    }

    /// Whether the floating action control needs driving
    pub fn drives_floating_action(&self) -> bool {
        self.floating != FloatPlan::Static
    }

    /// Whether the status bar color needs driving
    pub fn drives_status_bar(&self) -> bool {
        self.diff.status_bar
    }

    /// Chrome at an endpoint: `from` at or below 0, `to` at or above 1
    pub fn endpoint(&self, reveal: f32) -> Option<&Chrome> {
        if reveal <= 0.0 {
            Some(&self.from)
        } else if reveal >= 1.0 {
            Some(&self.to)
        } else {
            None
        }
    }

    /// Intermediate title bar state
    pub fn frame(&self, reveal: f32) -> HeaderFrame {
        let reveal = reveal.clamp(0.0, 1.0);
        let diff = &self.diff;
        let from_shift = self.shift.scaled(reveal);
        let to_shift = self.shift.scaled(-(1.0 - reveal));

        HeaderFrame {
            title: diff.title.then(|| TitleFrame {
                from: self.from.title.clone(),
                to: self.to.title.clone(),
                reveal,
                from_shift,
                to_shift,
            }),
            menu: diff.menu.then_some(MenuFrame {
                from: self.from.menu,
                to: self.to.menu,
                reveal,
            }),
            back_button: match self.back {
                BackPlan::Static => None,
                BackPlan::Morph { from, to } => Some(BackButtonFrame::Morph {
                    factor: lerp(from, to, reveal),
                }),
                BackPlan::FadeOut(kind) => Some(BackButtonFrame::Fade {
                    kind,
                    alpha: 1.0 - reveal,
                    shift: from_shift,
                }),
                BackPlan::FadeIn(kind) => Some(BackButtonFrame::Fade {
                    kind,
                    alpha: reveal,
                    shift: to_shift,
                }),
            },
            height: diff.height.then(|| {
                lerp(
                    self.from.title_bar_height(),
                    self.to.title_bar_height(),
                    reveal,
                )
            }),
            header_color: diff
                .header_color
                .then(|| self.from.header_color.blend(self.to.header_color, reveal)),
            text_color: diff
                .text_color
                .then(|| self.from.text_color.blend(self.to.text_color, reveal)),
            icon_color: diff
                .icon_color
                .then(|| self.from.icon_color.blend(self.to.icon_color, reveal)),
            shadow_alpha: diff
                .drop_shadow
                .then(|| lerp(flag(self.from.drop_shadow), flag(self.to.drop_shadow), reveal)),
            player_allowance: diff
                .player_bar
                .then(|| lerp(flag(self.from.player_bar), flag(self.to.player_bar), reveal)),
        }
    }

    /// Floating action state, `None` when it does not change
    pub fn floating_frame(&self, reveal: f32) -> Option<FloatingActionFrame> {
        if let Some(chrome) = self.endpoint(reveal) {
            return self
                .drives_floating_action()
                .then(|| FloatingActionFrame::settled(chrome));
        }
        match self.floating {
            FloatPlan::Static => None,
            FloatPlan::IconSwap { from, to } => {
                Some(FloatingActionFrame::Swap { from, to, reveal })
            }
            FloatPlan::ScaleOut(icon) => Some(FloatingActionFrame::Scale {
                icon,
                scale: 1.0 - reveal,
            }),
            FloatPlan::ScaleIn(icon) => Some(FloatingActionFrame::Scale {
                icon,
                scale: reveal,
            }),
        }
    }

    /// Status bar color, `None` when it does not change
    pub fn status_bar(&self, reveal: f32) -> Option<Argb> {
        self.diff.status_bar.then(|| {
            self.from
                .status_bar_color()
                .blend(self.to.status_bar_color(), reveal)
        })
    }

    /// Replace the chrome at reveal 1, keeping the slide distance
    pub fn retarget(&mut self, to: &Chrome) {
        *self = HeaderPlan::between(&self.from, to, self.shift);
    }
}

fn lerp(from: f32, to: f32, factor: f32) -> f32 {
    if factor <= 0.0 {
        from
    } else if factor >= 1.0 {
        to
    } else {
        from + (to - from) * factor
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
