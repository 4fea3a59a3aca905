//! Transition engine for the navigation shell
//!
//! This crate animates a navigation root between stack states:
//! - [`TransitionController`] owns the single transition in flight and derives
//!   content, dim, shadow and title bar state from one progress factor
//! - [`HeaderPlan`] cross-fades only the title bar subsystems that differ
//! - [`PeekSession`] tracks gesture-driven previews of the previous screen
//! - [`TitleBarTransform`] runs select, search and custom title bar modes
//! - [`NavigationContext`] ties them to a [`nav_stack::Stack`] and exposes the
//!   host-facing operations
//!
//! Rendering goes through the [`Scene`] trait; [`RecordingScene`] keeps the
//! last applied state for tests and headless hosts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod controller;
pub mod direction;
pub mod driver;
pub mod error;
pub mod header;
pub mod peek;
pub mod scene;
pub mod settings;
pub mod title_bar;

pub use context::{NavigateOptions, NavigationContext, Settled};
pub use controller::{
    FinishMode, Finished, Origin, RebaseMode, Side, TransitionController, TransitionSpec,
    TransitionState, Viewport,
};
pub use direction::Direction;
pub use driver::{drop_duration, Curve, Driver};
pub use error::{Refusal, Refused, Result, SettingsError};
pub use header::HeaderPlan;
pub use peek::{PeekPhase, PeekResolution, PeekSession};
pub use scene::{
    BackButtonFrame, ContentTransform, EdgeShadow, FloatingActionFrame, HeaderFrame, MenuFrame,
    Placement, RecordingScene, Scene, SceneEvent, Shift, TitleFrame,
};
pub use settings::NavigationSettings;
pub use title_bar::{ModeOutcome, ModeRequest, ModeStep, TitleBarState, TitleBarTransform};
