//! Title bar transform
//!
//! A screen-scoped nested transition that switches the title bar between a
//! screen's normal chrome and its select, search or custom chrome. It uses the
//! same [`HeaderPlan`] machinery as stack transitions, restricted to the title
//! bar. Requests made while the stack is moving are queued (one at a time) and
//! replayed once it settles.

use crate::driver::{Curve, Driver};
use crate::error::{Refusal, Result};
use crate::header::HeaderPlan;
use crate::scene::{Scene, Shift};
use nav_screen::{Chrome, ModeState, ScreenId, TransformMode};

/// Observable title bar state; factor 1 means fully transformed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleBarState {
    /// Active or animating mode
    pub mode: Option<TransformMode>,
    /// Transform progress
    pub factor: f32,
}

impl TitleBarState {
    /// State of a title bar at rest in `mode`
    pub fn resting(mode: &ModeState) -> Self {
        Self {
            mode: mode.mode(),
            factor: if mode.is_transformed() { 1.0 } else { 0.0 },
        }
    }
}

/// A mode change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    /// Enter a mode
    Enter {
        /// Mode to enter
        mode: TransformMode,
        /// Initial selection count
        initial_count: usize,
    },
    /// Leave a mode
    Leave(TransformMode),
}

/// Whether a mode request ran now or was queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    /// The transform started
    Started,
    /// The transform runs once the stack settles
    Deferred,
}

/// One applied transform step
#[derive(Debug, Clone, PartialEq)]
pub struct ModeStep {
    /// Transformed screen
    pub screen: ScreenId,
    /// Mode being entered or left
    pub mode: TransformMode,
    /// Transform progress
    pub factor: f32,
    /// Entering rather than leaving
    pub opening: bool,
    /// Last step of the transform
    pub finished: bool,
}

#[derive(Debug)]
struct Running {
    screen: ScreenId,
    mode: TransformMode,
    opening: bool,
    plan: HeaderPlan,
    driver: Driver,
    elapsed: u64,
    factor: f32,
}

impl Running {
    fn advance(&mut self, scene: &mut dyn Scene, factor: f32, finished: bool) -> ModeStep {
        if self.factor != factor || finished {
            apply(scene, &self.plan, factor);
        }
        self.factor = factor;
        ModeStep {
            screen: self.screen.clone(),
            mode: self.mode,
            factor,
            opening: self.opening,
            finished,
        }
    }
}

/// Title bar transform of the current screen
#[derive(Debug, Default)]
pub struct TitleBarTransform {
    running: Option<Running>,
    deferred: Option<(ScreenId, ModeRequest)>,
}

impl TitleBarTransform {
    /// Create an idle transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transform is animating
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Screen whose title bar is animating
    pub fn running_screen(&self) -> Option<&ScreenId> {
        self.running.as_ref().map(|running| &running.screen)
    }

    /// Whether the running transform is leaving its mode
    pub fn is_closing(&self) -> bool {
        self.running.as_ref().is_some_and(|running| !running.opening)
    }

    /// State of the running transform
    pub fn running_state(&self) -> Option<TitleBarState> {
        self.running.as_ref().map(|running| TitleBarState {
            mode: Some(running.mode),
            factor: running.factor,
        })
    }

    /// Start animating between `normal` and `transformed`
    pub fn start(
        &mut self,
        screen: ScreenId,
        mode: TransformMode,
        opening: bool,
        normal: &Chrome,
        transformed: &Chrome,
        duration_ms: u32,
    ) {
        let (from, to) = if opening { (0.0, 1.0) } else { (1.0, 0.0) };
        tracing::debug!(%screen, ?mode, opening, duration_ms, "Title bar transform started");
        self.running = Some(Running {
            screen,
            mode,
            opening,
            plan: HeaderPlan::between(normal, transformed, Shift::ZERO),
            driver: Driver::new(from, to, duration_ms, Curve::DECELERATE),
            elapsed: 0,
            factor: from,
        });
    }

    /// Advance the running transform
    pub fn tick(&mut self, scene: &mut dyn Scene, delta_ms: u64) -> Option<ModeStep> {
        let running = self.running.as_mut()?;
        running.elapsed = running.elapsed.saturating_add(delta_ms);
        let factor = running.driver.value_at(running.elapsed);
        let finished = running.driver.is_complete(running.elapsed);
        let step = running.advance(scene, factor, finished);
        self.settle(&step);
        Some(step)
    }

    /// Jump the running transform to its end
    pub fn finish_now(&mut self, scene: &mut dyn Scene) -> Option<ModeStep> {
        let running = self.running.as_mut()?;
        let factor = running.driver.to();
        let step = running.advance(scene, factor, true);
        self.settle(&step);
        Some(step)
    }

    fn settle(&mut self, step: &ModeStep) {
        if step.finished {
            tracing::debug!(
                screen = %step.screen,
                mode = ?step.mode,
                opening = step.opening,
                "Title bar transform finished"
            );
            self.running = None;
        }
    }

    /// Replace the transformed chrome of the running transform
    pub fn retarget(&mut self, scene: &mut dyn Scene, transformed: &Chrome) {
        if let Some(running) = self.running.as_mut() {
            running.plan.retarget(transformed);
            apply(scene, &running.plan, running.factor);
        }
    }

    /// Queue a request for when the stack settles
    pub fn defer(&mut self, screen: ScreenId, request: ModeRequest) -> Result<()> {
        if self.deferred.is_some() {
            tracing::debug!(%screen, ?request, reason = "busy", "Title bar request ignored");
            return Err(Refusal::TitleBarBusy);
        }
        tracing::debug!(%screen, ?request, "Title bar request deferred");
        self.deferred = Some((screen, request));
        Ok(())
    }

    /// Take the queued request
    pub fn take_deferred(&mut self) -> Option<(ScreenId, ModeRequest)> {
        self.deferred.take()
    }

    /// Drop the running transform and any queued request
    pub fn clear(&mut self) {
        self.running = None;
        self.deferred = None;
    }
}

fn apply(scene: &mut dyn Scene, plan: &HeaderPlan, factor: f32) {
    if plan.drives_header() {
        match plan.endpoint(factor) {
            Some(chrome) => scene.settle_header(chrome),
            None => scene.set_header(&plan.frame(factor)),
        }
    }
    if let Some(color) = plan.status_bar(factor) {
        scene.set_status_bar(color);
    }
    if let Some(frame) = plan.floating_frame(factor) {
        scene.set_floating_action(frame);
    }
}
