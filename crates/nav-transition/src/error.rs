//! Navigation errors
//!
//! Refused requests are expected races in an event-driven shell. They are
//! returned so callers can inspect them, but refusing never changes state.

use nav_screen::Screen;
use std::fmt;
use thiserror::Error;

/// Why a navigation, peek or title bar request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    /// A transition is in flight
    #[error("A transition is already in flight")]
    Animating,

    /// The stack is locked
    #[error("The stack is locked")]
    StackLocked,

    /// There is no current screen
    #[error("The stack is empty")]
    EmptyStack,

    /// There is nothing below the current screen
    #[error("Already at the root screen")]
    AtRoot,

    /// The current screen's title bar is transforming
    #[error("The current screen is transforming")]
    CurrentTransforming,

    /// The navigation context or the target screen was destroyed
    #[error("The target was destroyed")]
    Destroyed,

    /// No peek session is open
    #[error("No peek session is open")]
    NoPeekSession,

    /// The peek session was already released
    #[error("The peek session is resolving")]
    PeekResolving,

    /// Another title bar mode is active
    #[error("Another title bar mode is active")]
    ModeConflict,

    /// The requested title bar mode is not active
    #[error("The title bar mode is not active")]
    NotInMode,

    /// A title bar transform is running and another request is already queued
    #[error("The title bar is busy")]
    TitleBarBusy,

    /// No screen with that id is on the stack
    #[error("Unknown screen")]
    UnknownScreen,

    /// The index does not point below the current screen
    #[error("Index is not below the current screen")]
    OutOfBounds,

    /// The current screen only leaves the stack through a transition
    #[error("The current screen cannot be removed directly")]
    IsCurrent,
}

/// Result of a navigation request
pub type Result<T> = std::result::Result<T, Refusal>;

/// A refused `navigate_to`, handing the screen back
pub struct Refused {
    reason: Refusal,
    screen: Box<dyn Screen>,
}

impl Refused {
    /// Pair a refusal with the screen that was not consumed
    pub fn new(reason: Refusal, screen: Box<dyn Screen>) -> Self {
        Self { reason, screen }
    }

    /// Why the request was refused
    pub fn reason(&self) -> Refusal {
        self.reason
    }

    /// Take the screen back
    pub fn into_screen(self) -> Box<dyn Screen> {
        self.screen
    }
}

impl fmt::Debug for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refused")
            .field("reason", &self.reason)
            .field("screen", self.screen.id())
            .finish()
    }
}

impl fmt::Display for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Navigation to {} refused: {}", self.screen.id(), self.reason)
    }
}

impl std::error::Error for Refused {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the settings file failed
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings are not valid JSON
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
