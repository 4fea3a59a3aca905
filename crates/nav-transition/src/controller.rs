//! Single-flight transition controller
//!
//! This module provides the state machine behind every stack-level transition:
//! - One [`TransitionState`] at a time; `prepare` refuses while one is active
//! - `set_progress` re-derives content, dim, shadow, title bar, status bar and
//!   floating action from a single factor, driving only what differs
//! - `drive`/`tick` advance the factor with a [`Driver`] on synthetic time
//! - `finish` snaps to the end state and detaches the inactive side
//!
//! Progress is the displacement of the right (upper) screen: 0 shows the right
//! screen, 1 shows the left one. Forward transitions run 1 -> 0, backward ones
//! and peek commits 0 -> 1.

use crate::direction::Direction;
use crate::driver::{Curve, Driver};
use crate::error::{Refusal, Result};
use crate::header::HeaderPlan;
use crate::scene::{ContentTransform, EdgeShadow, Placement, Scene, Shift};
use crate::settings::{LayoutSettings, NavigationSettings};
use nav_screen::tokens::{header, shadow};
use nav_screen::{Chrome, ScreenId};

// =============================================================================
// Transition Types
// =============================================================================

/// How a rebase navigation rewrites the stack once it commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebaseMode {
    /// Only the new screen remains
    DropHistory,
    /// The root and the new screen remain
    KeepRoot,
}

/// What started a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Forward navigation to a new screen
    Push {
        /// Rebase applied on commit
        rebase: Option<RebaseMode>,
    },
    /// Backward navigation
    Pop,
    /// Gesture-driven preview of the previous screen
    Peek,
}

impl Origin {
    /// Whether the right screen is being shown
    pub fn is_forward(&self) -> bool {
        matches!(self, Origin::Push { .. })
    }
}

/// How a transition ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishMode {
    /// The transition takes effect
    Commit,
    /// The transition is undone
    Cancel,
}

/// Size of the navigation root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(360.0, 640.0)
    }
}

/// One side of a transition
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    /// Screen id
    pub id: ScreenId,
    /// Chrome in the screen's current mode
    pub chrome: Chrome,
}

/// Everything `prepare` needs
#[derive(Debug, Clone)]
pub struct TransitionSpec {
    /// Lower screen
    pub left: Side,
    /// Upper screen
    pub right: Side,
    /// Content motion
    pub direction: Direction,
    /// What started the transition
    pub origin: Origin,
    /// Navigation root size
    pub viewport: Viewport,
    /// The left screen is already in the live tree
    pub left_attached: bool,
}

/// The transition in flight
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionState {
    progress: f32,
    direction: Direction,
    origin: Origin,
    left: ScreenId,
    right: ScreenId,
}

impl TransitionState {
    /// Displacement of the right screen
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Content motion
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the right screen is being shown
    pub fn forward(&self) -> bool {
        self.origin.is_forward()
    }

    /// What started the transition
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Lower screen
    pub fn left(&self) -> &ScreenId {
        &self.left
    }

    /// Upper screen
    pub fn right(&self) -> &ScreenId {
        &self.right
    }

    /// Progress at which the transition ends with `mode`
    pub fn end_progress(&self, mode: FinishMode) -> f32 {
        match (self.origin.is_forward(), mode) {
            (true, FinishMode::Commit) | (false, FinishMode::Cancel) => 0.0,
            (true, FinishMode::Cancel) | (false, FinishMode::Commit) => 1.0,
        }
    }
}

/// Result of `finish`
#[derive(Debug, Clone, PartialEq)]
pub struct Finished {
    /// State at the end of the transition
    pub state: TransitionState,
    /// How it ended
    pub mode: FinishMode,
    /// Screen removed from the live tree
    pub detached: Option<ScreenId>,
}

// =============================================================================
// Controller
// =============================================================================

#[derive(Debug)]
struct Run {
    driver: Driver,
    elapsed: u64,
    mode: FinishMode,
}

#[derive(Debug)]
struct Active {
    state: TransitionState,
    plan: HeaderPlan,
    left_popup: bool,
    right_popup: bool,
    left_attached: bool,
    right_header_height: f32,
    viewport: Viewport,
    applied: Option<f32>,
    run: Option<Run>,
}

/// Owns the single transition of a navigation root
#[derive(Debug)]
pub struct TransitionController {
    layout: LayoutSettings,
    rtl: bool,
    active: Option<Active>,
}

impl TransitionController {
    /// Create an idle controller
    pub fn new(settings: &NavigationSettings) -> Self {
        Self {
            layout: settings.layout.clone(),
            rtl: settings.rtl,
            active: None,
        }
    }

    /// Whether a transition is in flight
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a driver is advancing the transition
    pub fn is_driving(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.run.is_some())
    }

    /// The transition in flight
    pub fn state(&self) -> Option<&TransitionState> {
        self.active.as_ref().map(|active| &active.state)
    }

    /// Current progress
    pub fn progress(&self) -> Option<f32> {
        self.state().map(TransitionState::progress)
    }

    /// Attach the incoming side, plan the chrome cross-fade and move to the
    /// start position.
    pub fn prepare(&mut self, scene: &mut dyn Scene, spec: TransitionSpec) -> Result<()> {
        if self.active.is_some() {
            tracing::debug!(reason = "animating", "Transition prepare ignored");
            return Err(Refusal::Animating);
        }

        match spec.origin {
            Origin::Push { .. } => scene.attach(&spec.right.id, Placement::Above),
            Origin::Pop | Origin::Peek if !spec.left_attached => {
                scene.attach(&spec.left.id, Placement::Below)
            }
            Origin::Pop | Origin::Peek => {}
        }

        let shift = self.title_shift(&spec);
        let plan = HeaderPlan::between(&spec.right.chrome, &spec.left.chrome, shift);
        let initial = if spec.origin.is_forward() { 1.0 } else { 0.0 };

        tracing::debug!(
            left = %spec.left.id,
            right = %spec.right.id,
            direction = ?spec.direction,
            origin = ?spec.origin,
            header = plan.drives_header(),
            "Transition prepared"
        );

        let mut active = Active {
            state: TransitionState {
                progress: initial,
                direction: spec.direction,
                origin: spec.origin,
                left: spec.left.id,
                right: spec.right.id,
            },
            plan,
            left_popup: spec.left.chrome.popup,
            right_popup: spec.right.chrome.popup,
            left_attached: spec.left_attached,
            right_header_height: spec.right.chrome.title_bar_height(),
            viewport: spec.viewport,
            applied: None,
            run: None,
        };
        active.apply(scene, initial, &self.layout, self.rtl);
        self.active = Some(active);
        Ok(())
    }

    fn title_shift(&self, spec: &TransitionSpec) -> Shift {
        match spec.direction {
            Direction::Horizontal => {
                let sign = if self.rtl { -1.0 } else { 1.0 };
                Shift {
                    x: sign * spec.viewport.width * self.layout.title_shift_factor,
                    y: 0.0,
                }
            }
            Direction::Vertical => {
                let height = spec
                    .left
                    .chrome
                    .title_bar_height()
                    .max(spec.right.chrome.title_bar_height());
                Shift {
                    x: 0.0,
                    y: height * header::VERTICAL_SHIFT_FACTOR,
                }
            }
            Direction::Fade | Direction::None => Shift::ZERO,
        }
    }

    /// Re-apply everything for `factor`. Returns `false` when nothing changed.
    pub fn set_progress(&mut self, scene: &mut dyn Scene, factor: f32) -> bool {
        match self.active.as_mut() {
            Some(active) => active.apply(scene, factor, &self.layout, self.rtl),
            None => false,
        }
    }

    /// Animate from the current progress to the end position of `mode`
    pub fn drive(
        &mut self,
        mode: FinishMode,
        duration_ms: u32,
        curve: Curve,
        delay_ms: u32,
    ) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let target = active.state.end_progress(mode);
        let driver =
            Driver::new(active.state.progress, target, duration_ms, curve).with_delay(delay_ms);
        tracing::debug!(?mode, duration_ms, delay_ms, "Transition driven");
        active.run = Some(Run {
            driver,
            elapsed: 0,
            mode,
        });
        true
    }

    /// Advance the driver. Returns the finish mode once it completes.
    pub fn tick(&mut self, scene: &mut dyn Scene, delta_ms: u64) -> Option<FinishMode> {
        let active = self.active.as_mut()?;
        let run = active.run.as_mut()?;
        run.elapsed = run.elapsed.saturating_add(delta_ms);

        let driver = run.driver;
        let elapsed = run.elapsed;
        let mode = run.mode;
        let mut value = driver.value_at(elapsed);

        // Progress never reverses within one driven run
        let current = active.state.progress;
        value = if driver.to() >= driver.from() {
            value.max(current)
        } else {
            value.min(current)
        };

        active.apply(scene, value, &self.layout, self.rtl);
        tracing::trace!(progress = value, elapsed, "Transition tick");

        if driver.is_complete(elapsed) {
            active.run = None;
            Some(mode)
        } else {
            None
        }
    }

    /// Snap to the end position of `mode`, detach the inactive side and
    /// clear the transition.
    pub fn finish(&mut self, scene: &mut dyn Scene, mode: FinishMode) -> Option<Finished> {
        let mut active = self.active.take()?;
        let end = active.state.end_progress(mode);
        active.apply(scene, end, &self.layout, self.rtl);

        let left_inactive = end <= 0.0;
        let detached = if left_inactive {
            let retained = match active.state.origin {
                Origin::Push { .. } => active.left_popup || active.right_popup,
                Origin::Pop | Origin::Peek => active.left_attached,
            };
            (!retained).then(|| active.state.left.clone())
        } else {
            Some(active.state.right.clone())
        };

        if let Some(id) = &detached {
            scene.detach(id);
        }
        if active.state.direction == Direction::Horizontal {
            scene.set_edge_shadow(None);
        }

        tracing::debug!(
            origin = ?active.state.origin,
            ?mode,
            detached = ?detached,
            "Transition finished"
        );

        Some(Finished {
            state: active.state,
            mode,
            detached,
        })
    }

    /// Update the viewport and re-apply the current progress
    pub fn set_viewport(&mut self, scene: &mut dyn Scene, viewport: Viewport) {
        if let Some(active) = self.active.as_mut() {
            active.viewport = viewport;
            active.applied = None;
            let progress = active.state.progress;
            active.apply(scene, progress, &self.layout, self.rtl);
        }
    }
}

impl Active {
    fn apply(&mut self, scene: &mut dyn Scene, factor: f32, layout: &LayoutSettings, rtl: bool) -> bool {
        if factor.is_nan() {
            tracing::debug!("NaN progress ignored");
            return false;
        }
        let progress = factor.clamp(0.0, 1.0);
        if self.applied == Some(progress) {
            return false;
        }
        self.applied = Some(progress);
        self.state.progress = progress;

        self.apply_content(scene, progress, layout, rtl);

        let reveal = self.header_reveal(progress);
        if self.plan.drives_header() {
            match self.plan.endpoint(reveal) {
                Some(chrome) => scene.settle_header(chrome),
                None => scene.set_header(&self.plan.frame(reveal)),
            }
        }
        if let Some(color) = self.plan.status_bar(reveal) {
            scene.set_status_bar(color);
        }
        if let Some(frame) = self.plan.floating_frame(reveal) {
            scene.set_floating_action(frame);
        }
        true
    }

    fn apply_content(&self, scene: &mut dyn Scene, p: f32, layout: &LayoutSettings, rtl: bool) {
        let left = &self.state.left;
        let right = &self.state.right;
        match self.state.direction {
            Direction::None => {}
            Direction::Fade => {
                scene.set_content(right, ContentTransform::faded(1.0 - p));
            }
            Direction::Horizontal => {
                let sign = if rtl { -1.0 } else { 1.0 };
                let width = self.viewport.width;
                let parallax = width / layout.parallax_divisor;
                let (right_content, left_content, edge) = if p <= 0.0 {
                    (
                        ContentTransform::IDENTITY,
                        ContentTransform::horizontal(-sign * parallax),
                        None,
                    )
                } else if p >= 1.0 {
                    (
                        ContentTransform::horizontal(sign * width),
                        ContentTransform::IDENTITY,
                        None,
                    )
                } else {
                    let edge = EdgeShadow {
                        x: sign * p * width,
                        alpha: (shadow::EDGE_ALPHA_BASE + shadow::EDGE_ALPHA_RANGE * (1.0 - p))
                            .min(1.0),
                    };
                    (
                        ContentTransform::horizontal(sign * p * width),
                        ContentTransform::horizontal(-sign * (1.0 - p) * parallax),
                        Some(edge),
                    )
                };
                scene.set_content(right, right_content);
                scene.set_content(left, left_content);
                scene.set_edge_shadow(edge);
                self.apply_dim(scene, p, layout);
            }
            Direction::Vertical => {
                let content = if p <= 0.0 {
                    ContentTransform::IDENTITY
                } else {
                    ContentTransform::vertical((p * self.viewport.height).round())
                };
                scene.set_content(right, content);
                self.apply_dim(scene, p, layout);
            }
        }
    }

    fn apply_dim(&self, scene: &mut dyn Scene, p: f32, layout: &LayoutSettings) {
        if !self.left_popup {
            scene.set_dim(&self.state.left, layout.dim_max * (1.0 - p));
        }
    }

    /// Title bar reveal; vertical sheets swap the header within its height
    fn header_reveal(&self, p: f32) -> f32 {
        match self.state.direction {
            Direction::Vertical if p > 0.0 && p < 1.0 => {
                let header_height = self.right_header_height.max(1.0);
                (p * self.viewport.height / header_height).min(1.0)
            }
            _ => p,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MockScene, RecordingScene, SceneEvent};
    use nav_screen::{Argb, BackButton};

    fn side(id: &str, chrome: Chrome) -> Side {
        Side {
            id: ScreenId::new(id),
            chrome,
        }
    }

    fn spec(direction: Direction, origin: Origin, left: Chrome, right: Chrome) -> TransitionSpec {
        TransitionSpec {
            left: side("a", left),
            right: side("b", right),
            direction,
            origin,
            viewport: Viewport::new(300.0, 600.0),
            left_attached: true,
        }
    }

    fn push() -> Origin {
        Origin::Push { rebase: None }
    }

    fn controller() -> TransitionController {
        TransitionController::new(&NavigationSettings::default())
    }

    #[test]
    fn test_prepare_is_single_flight() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        let chrome = Chrome::titled("A");
        controller
            .prepare(&mut scene, spec(Direction::Horizontal, push(), chrome.clone(), chrome.clone()))
            .unwrap();
        let before = controller.state().cloned();

        let result = controller.prepare(
            &mut scene,
            spec(Direction::Fade, Origin::Pop, chrome.clone(), chrome),
        );
        assert_eq!(result, Err(Refusal::Animating));
        assert_eq!(controller.state().cloned(), before);
    }

    #[test]
    fn test_forward_prepare_attaches_right_hidden() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        controller
            .prepare(
                &mut scene,
                spec(Direction::Horizontal, push(), Chrome::titled("A"), Chrome::titled("B")),
            )
            .unwrap();
        let b = ScreenId::new("b");
        assert!(scene.is_attached(&b));
        assert_eq!(controller.progress(), Some(1.0));
        assert_eq!(scene.content(&b), Some(ContentTransform::horizontal(300.0)));
        assert_eq!(scene.settled_header().unwrap().title, Chrome::titled("A").title);
    }

    #[test]
    fn test_horizontal_law() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        controller
            .prepare(
                &mut scene,
                spec(Direction::Horizontal, push(), Chrome::titled("A"), Chrome::titled("B")),
            )
            .unwrap();
        controller.set_progress(&mut scene, 0.5);

        let a = ScreenId::new("a");
        let b = ScreenId::new("b");
        assert_eq!(scene.content(&b), Some(ContentTransform::horizontal(150.0)));
        assert_eq!(scene.content(&a), Some(ContentTransform::horizontal(-50.0)));
        assert!((scene.dim(&a).unwrap() - 0.04).abs() < 1e-6);
        let edge = scene.edge_shadow().unwrap();
        assert_eq!(edge.x, 150.0);
        assert!((edge.alpha - 0.825).abs() < 1e-6);
        assert!(scene.header().unwrap().title.is_some());
    }

    #[test]
    fn test_rtl_mirrors_horizontal_motion() {
        let settings = NavigationSettings {
            rtl: true,
            ..NavigationSettings::default()
        };
        let mut scene = RecordingScene::new();
        let mut controller = TransitionController::new(&settings);
        controller
            .prepare(
                &mut scene,
                spec(Direction::Horizontal, Origin::Pop, Chrome::titled("A"), Chrome::titled("B")),
            )
            .unwrap();
        controller.set_progress(&mut scene, 0.5);
        assert_eq!(
            scene.content(&ScreenId::new("b")),
            Some(ContentTransform::horizontal(-150.0))
        );
    }

    #[test]
    fn test_fade_and_vertical_laws() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        let chrome = Chrome::titled("A");
        controller
            .prepare(&mut scene, spec(Direction::Fade, Origin::Pop, chrome.clone(), chrome.clone()))
            .unwrap();
        controller.set_progress(&mut scene, 0.25);
        assert_eq!(
            scene.content(&ScreenId::new("b")),
            Some(ContentTransform::faded(0.75))
        );
        controller.finish(&mut scene, FinishMode::Commit);

        let mut scene = RecordingScene::new();
        controller
            .prepare(
                &mut scene,
                spec(Direction::Vertical, Origin::Pop, chrome.clone(), chrome.as_popup()),
            )
            .unwrap();
        controller.set_progress(&mut scene, 0.333);
        assert_eq!(
            scene.content(&ScreenId::new("b")),
            Some(ContentTransform::vertical(200.0))
        );
    }

    #[test]
    fn test_none_direction_moves_nothing() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        let chrome = Chrome::titled("A");
        controller
            .prepare(&mut scene, spec(Direction::None, Origin::Pop, chrome.clone(), chrome))
            .unwrap();
        controller.set_progress(&mut scene, 0.5);
        assert!(!scene
            .events()
            .iter()
            .any(|event| matches!(event, SceneEvent::Content(..) | SceneEvent::Dim(..))));
    }

    #[test]
    fn test_set_progress_is_idempotent() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        controller
            .prepare(
                &mut scene,
                spec(Direction::Horizontal, Origin::Pop, Chrome::titled("A"), Chrome::titled("B")),
            )
            .unwrap();
        assert!(controller.set_progress(&mut scene, 1.0));
        let events = scene.events().len();
        assert!(!controller.set_progress(&mut scene, 1.0));
        assert!(!controller.set_progress(&mut scene, 7.0));
        assert_eq!(scene.events().len(), events);
        assert!(!controller.set_progress(&mut scene, f32::NAN));
    }

    #[test]
    fn test_endpoints_snap_to_settled_state() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        let left = Chrome::titled("A").with_colors(Argb::WHITE, Argb::BLACK, Argb::BLACK);
        let right = Chrome::titled("B").with_back_button(BackButton::Close);
        controller
            .prepare(&mut scene, spec(Direction::Horizontal, Origin::Pop, left.clone(), right.clone()))
            .unwrap();
        assert_eq!(scene.settled_header(), Some(&right));
        controller.set_progress(&mut scene, 0.5);
        assert!(scene.header().is_some());
        controller.set_progress(&mut scene, 1.0);
        assert!(scene.header().is_none());
        assert_eq!(scene.settled_header(), Some(&left));
        assert_eq!(scene.status_bar(), Some(left.status_bar_color()));
        assert_eq!(scene.edge_shadow(), None);
        assert_eq!(scene.dim(&ScreenId::new("a")), Some(0.0));
    }

    #[test]
    fn test_drive_is_monotonic_and_finishes() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        controller
            .prepare(
                &mut scene,
                spec(Direction::Horizontal, push(), Chrome::titled("A"), Chrome::titled("B")),
            )
            .unwrap();
        assert!(controller.drive(FinishMode::Commit, 400, Curve::NAVIGATION, 0));

        let mut last = 1.0;
        let mut finished = None;
        for _ in 0..100 {
            finished = controller.tick(&mut scene, 16);
            let progress = controller.progress().unwrap();
            assert!(progress <= last);
            last = progress;
            if finished.is_some() {
                break;
            }
        }
        assert_eq!(finished, Some(FinishMode::Commit));
        assert_eq!(controller.progress(), Some(0.0));

        let done = controller.finish(&mut scene, FinishMode::Commit).unwrap();
        assert_eq!(done.detached, Some(ScreenId::new("a")));
        assert!(!controller.is_active());
        assert!(!scene.is_attached(&ScreenId::new("a")));
    }

    #[test]
    fn test_popup_keeps_left_attached() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        scene.attach(&ScreenId::new("a"), Placement::Above);
        controller
            .prepare(
                &mut scene,
                spec(Direction::Vertical, push(), Chrome::titled("A"), Chrome::titled("B").as_popup()),
            )
            .unwrap();
        let done = controller.finish(&mut scene, FinishMode::Commit).unwrap();
        assert_eq!(done.detached, None);
        assert!(scene.is_attached(&ScreenId::new("a")));
        assert!(scene.is_attached(&ScreenId::new("b")));
    }

    #[test]
    fn test_cancelled_pop_detaches_left() {
        let mut scene = RecordingScene::new();
        let mut controller = controller();
        let mut spec = spec(Direction::Horizontal, Origin::Peek, Chrome::titled("A"), Chrome::titled("B"));
        spec.left_attached = false;
        controller.prepare(&mut scene, spec).unwrap();
        assert!(scene.is_attached(&ScreenId::new("a")));
        controller.set_progress(&mut scene, 0.3);
        let done = controller.finish(&mut scene, FinishMode::Cancel).unwrap();
        assert_eq!(done.state.progress(), 0.0);
        assert_eq!(done.detached, Some(ScreenId::new("a")));
    }

    #[test]
    fn test_unchanged_chrome_is_never_driven() {
        let mut scene = MockScene::new();
        scene.expect_attach().times(1).return_const(());
        scene.expect_set_content().return_const(());
        scene.expect_set_dim().return_const(());
        scene.expect_set_edge_shadow().return_const(());
        scene.expect_detach().times(1).return_const(());
        scene.expect_set_header().never();
        scene.expect_settle_header().never();
        scene.expect_set_status_bar().never();
        scene.expect_set_floating_action().never();

        let chrome = Chrome::titled("Same").with_floating_action(3);
        let mut controller = controller();
        controller
            .prepare(&mut scene, spec(Direction::Horizontal, push(), chrome.clone(), chrome))
            .unwrap();
        for step in [0.9, 0.5, 0.1, 0.0] {
            controller.set_progress(&mut scene, step);
        }
        controller.finish(&mut scene, FinishMode::Commit);
    }

    #[test]
    fn test_only_differing_subsystems_are_driven() {
        let mut scene = MockScene::new();
        scene.expect_attach().return_const(());
        scene.expect_set_content().return_const(());
        scene.expect_set_dim().return_const(());
        scene.expect_set_edge_shadow().return_const(());
        scene
            .expect_set_header()
            .withf(|frame| {
                frame.title.is_none()
                    && frame.back_button.is_none()
                    && frame.menu.is_none()
                    && frame.header_color.is_none()
                    && frame.shadow_alpha.is_some()
            })
            .times(1)
            .return_const(());
        scene.expect_settle_header().return_const(());
        scene.expect_set_status_bar().never();
        scene.expect_set_floating_action().never();

        let left = Chrome::titled("Same").with_drop_shadow(true);
        let right = Chrome::titled("Same").with_drop_shadow(false);
        let mut controller = controller();
        controller
            .prepare(&mut scene, spec(Direction::Horizontal, push(), left, right))
            .unwrap();
        controller.set_progress(&mut scene, 0.5);
    }

    #[test]
    fn test_end_progress() {
        let state = TransitionState {
            progress: 0.5,
            direction: Direction::Horizontal,
            origin: push(),
            left: ScreenId::new("a"),
            right: ScreenId::new("b"),
        };
        assert_eq!(state.end_progress(FinishMode::Commit), 0.0);
        assert_eq!(state.end_progress(FinishMode::Cancel), 1.0);
        assert!(state.forward());

        let state = TransitionState {
            origin: Origin::Peek,
            ..state
        };
        assert_eq!(state.end_progress(FinishMode::Commit), 1.0);
        assert_eq!(state.end_progress(FinishMode::Cancel), 0.0);
    }
}
