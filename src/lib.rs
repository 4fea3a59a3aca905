//! Navshell
//!
//! Navigation and transition core for a mobile app shell:
//! - [`nav_screen`]: screens, chrome descriptors, colors and design tokens
//! - [`nav_stack`]: the ordered screen stack
//! - [`nav_transition`]: the transition controller, title bar modes, peek
//!   sessions and the [`NavigationContext`] facade
//!
//! # Example
//!
//! ```rust
//! use navshell::{Chrome, NavigationContext, NavigationSettings, RecordingScene, Screen, ScreenId, Viewport};
//!
//! struct Page(ScreenId);
//!
//! impl Screen for Page {
//!     fn id(&self) -> &ScreenId {
//!         &self.0
//!     }
//!
//!     fn chrome(&self) -> Chrome {
//!         Chrome::titled("Inbox")
//!     }
//! }
//!
//! navshell::init_tracing();
//! let mut nav = NavigationContext::new(
//!     RecordingScene::new(),
//!     NavigationSettings::default(),
//!     Viewport::new(360.0, 640.0),
//! );
//! nav.set_root(Box::new(Page(ScreenId::new("inbox")))).unwrap();
//! assert!(nav.can_navigate());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use tracing_subscriber::EnvFilter;

pub use nav_screen::{
    default_mode_chrome, Argb, BackButton, Chrome, ModeState, ReadyToken, Readiness, Screen,
    ScreenId, Title, TransformMode, TransitionHints,
};
pub use nav_stack::{Stack, StackEntry};
pub use nav_transition::{
    Direction, FinishMode, ModeOutcome, NavigateOptions, NavigationContext, NavigationSettings,
    PeekResolution, RebaseMode, RecordingScene, Refusal, Refused, Scene, Settled, TitleBarState,
    TransitionState, Viewport,
};

/// Environment variable holding log directives, e.g. `nav_transition=debug`
pub const LOG_ENV: &str = "NAVSHELL_LOG";

/// Install a stderr subscriber filtered by `NAVSHELL_LOG`, then `RUST_LOG`,
/// then `warn`.
///
/// Returns `false` when a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

fn env_filter() -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}
