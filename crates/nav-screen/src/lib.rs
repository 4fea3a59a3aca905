//! Screen contract for the navigation shell
//!
//! This crate defines what a screen has to provide to take part in stack
//! navigation: identity, declared title bar chrome, lifecycle hooks and the
//! title bar mode hooks.
//!
//! # Modules
//!
//! - [`screen`] - The [`Screen`] trait, ids, modes and readiness
//! - [`chrome`] - Declared chrome and chrome diffs
//! - [`color`] - ARGB colors and blending
//! - [`tokens`] - Sizes, durations, easing curves and thresholds
//!
//! # Example
//!
//! ```rust
//! use nav_screen::{Chrome, ModeState, Screen, ScreenId};
//!
//! struct Settings {
//!     id: ScreenId,
//! }
//!
//! impl Screen for Settings {
//!     fn id(&self) -> &ScreenId {
//!         &self.id
//!     }
//!
//!     fn chrome(&self) -> Chrome {
//!         Chrome::titled("Settings")
//!     }
//! }
//!
//! let screen = Settings { id: ScreenId::new("settings") };
//! let searching = screen.mode_chrome(&ModeState::Search);
//! assert!(screen.chrome().diff(&searching).back_button);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chrome;
pub mod color;
pub mod screen;
pub mod tokens;

pub use chrome::{BackButton, Chrome, ChromeDiff, ModeColors, Title};
pub use color::{Argb, ColorError};
pub use screen::{
    default_mode_chrome, ModeState, ReadyToken, Readiness, Screen, ScreenId, TransformMode,
    TransitionHints,
};
