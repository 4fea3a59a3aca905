//! Peek (preview) sessions
//!
//! A peek lets the screen below the current one surface under a gesture
//! without popping anything. The session moves `Active -> Committing` or
//! `Active -> Cancelling` on release; the navigation context removes it once
//! the transition finishes.

use crate::controller::FinishMode;
use crate::driver::drop_duration;
use crate::settings::{NavigationSettings, PeekSettings};
use nav_screen::ScreenId;

/// Phase of a peek session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekPhase {
    /// Following the gesture
    Active,
    /// Released, animating to the revealed screen
    Committing,
    /// Released, animating back to the anchor screen
    Cancelling,
}

/// Outcome of releasing a peek gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekResolution {
    /// Commit or cancel
    pub mode: FinishMode,
    /// Length of the drop animation
    pub duration_ms: u32,
}

/// Decide a release: flings decide by direction, slow releases by distance
pub fn resolve_release(fraction: f32, velocity: f32, settings: &PeekSettings) -> FinishMode {
    if velocity >= settings.fling_velocity {
        FinishMode::Commit
    } else if velocity <= -settings.fling_velocity {
        FinishMode::Cancel
    } else if fraction > settings.commit_threshold {
        FinishMode::Commit
    } else {
        FinishMode::Cancel
    }
}

/// A gesture-driven preview of the previous stack entry
#[derive(Debug, Clone, PartialEq)]
pub struct PeekSession {
    anchor: ScreenId,
    revealed: ScreenId,
    offset: f32,
    extent: f32,
    vertical: bool,
    phase: PeekPhase,
}

impl PeekSession {
    /// Start a session over `anchor`, revealing `revealed` across `extent`
    pub fn new(anchor: ScreenId, revealed: ScreenId, extent: f32, vertical: bool) -> Self {
        Self {
            anchor,
            revealed,
            offset: 0.0,
            extent: extent.max(0.0),
            vertical,
            phase: PeekPhase::Active,
        }
    }

    /// Screen being moved aside
    pub fn anchor(&self) -> &ScreenId {
        &self.anchor
    }

    /// Screen being revealed
    pub fn revealed(&self) -> &ScreenId {
        &self.revealed
    }

    /// Gesture offset
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Full gesture distance
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Whether the gesture is vertical
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Current phase
    pub fn phase(&self) -> PeekPhase {
        self.phase
    }

    /// Whether the session was released
    pub fn is_resolving(&self) -> bool {
        self.phase != PeekPhase::Active
    }

    /// `Some(true)` once committing, `Some(false)` once cancelling
    pub fn committed(&self) -> Option<bool> {
        match self.phase {
            PeekPhase::Active => None,
            PeekPhase::Committing => Some(true),
            PeekPhase::Cancelling => Some(false),
        }
    }

    /// Revealed fraction
    pub fn fraction(&self) -> f32 {
        if self.extent > 0.0 {
            (self.offset / self.extent).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Follow the gesture. Returns the new progress, `None` once released.
    pub fn drag(&mut self, offset: f32) -> Option<f32> {
        if self.is_resolving() {
            return None;
        }
        self.offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, self.extent)
        };
        Some(self.fraction())
    }

    /// Release with `velocity` (px/s, positive towards revealing)
    pub fn release(&mut self, velocity: f32, settings: &NavigationSettings) -> PeekResolution {
        let mode = resolve_release(self.fraction(), velocity, &settings.peek);
        self.resolve_as(mode, velocity, settings)
    }

    /// Resolve to `mode`, timing the drop from `velocity`
    pub fn resolve_as(
        &mut self,
        mode: FinishMode,
        velocity: f32,
        settings: &NavigationSettings,
    ) -> PeekResolution {
        let (min, max) = settings.drop_bounds(self.vertical);
        let (distance, speed) = match mode {
            FinishMode::Commit => (self.extent - self.offset, velocity.max(0.0)),
            FinishMode::Cancel => (self.offset, (-velocity).max(0.0)),
        };
        self.phase = match mode {
            FinishMode::Commit => PeekPhase::Committing,
            FinishMode::Cancel => PeekPhase::Cancelling,
        };
        let resolution = PeekResolution {
            mode,
            duration_ms: drop_duration(distance, speed, min, max),
        };
        tracing::debug!(
            anchor = %self.anchor,
            fraction = self.fraction(),
            velocity,
            mode = ?resolution.mode,
            duration_ms = resolution.duration_ms,
            "Peek resolved"
        );
        resolution
    }
}
