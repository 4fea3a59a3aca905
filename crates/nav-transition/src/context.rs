//! Navigation context
//!
//! This module provides the object a host composes its navigation root from:
//! - Owns the [`Stack`], the [`TransitionController`], the peek session and
//!   the title bar transform of one navigation root
//! - Navigation: `navigate_to`, `navigate_back`, `can_navigate`
//! - Stack edits below the current screen: `insert_screen`, `remove_screen`,
//!   `move_screen`. Multi-entry rebase only happens while a transition
//!   settles, through [`Settled::rebase`]
//! - Peek: `open_preview`, `drag_preview`, `release_preview`, `apply_preview`,
//!   `close_preview`, `force_close_preview`
//! - Title bar modes: `enter_mode`, `leave_mode`, `set_selected_count`
//! - Host events: `tick`, `signal_ready`, `on_back_pressed`, `focus`, `blur`,
//!   `destroy_screen`, `shutdown`
//!
//! Everything runs on the thread that owns the context. Time only advances
//! through [`NavigationContext::tick`].
//!
//! # Example
//!
//! ```rust
//! use nav_screen::{Chrome, Screen, ScreenId};
//! use nav_transition::{NavigationContext, NavigationSettings, RecordingScene, Viewport};
//!
//! struct Page(ScreenId);
//!
//! impl Screen for Page {
//!     fn id(&self) -> &ScreenId {
//!         &self.0
//!     }
//!
//!     fn chrome(&self) -> Chrome {
//!         Chrome::titled(self.0.as_str())
//!     }
//! }
//!
//! let mut nav = NavigationContext::new(
//!     RecordingScene::new(),
//!     NavigationSettings::default(),
//!     Viewport::default(),
//! );
//! nav.set_root(Box::new(Page(ScreenId::new("home")))).unwrap();
//! nav.navigate_to(Box::new(Page(ScreenId::new("chat")))).unwrap();
//! assert!(nav.is_animating());
//!
//! while nav.is_animating() {
//!     nav.tick(16);
//! }
//! assert_eq!(nav.stack_ids(), vec![ScreenId::new("home"), ScreenId::new("chat")]);
//! ```

use crate::controller::{
    FinishMode, Finished, Origin, RebaseMode, Side, TransitionController, TransitionSpec,
    TransitionState, Viewport,
};
use crate::direction::{start_delay, Direction};
use crate::driver::Curve;
use crate::error::{Refusal, Refused, Result};
use crate::peek::{PeekResolution, PeekSession};
use crate::scene::{FloatingActionFrame, Placement, Scene};
use crate::settings::NavigationSettings;
use crate::title_bar::{ModeOutcome, ModeRequest, ModeStep, TitleBarState, TitleBarTransform};
use nav_screen::{ModeState, ReadyToken, Readiness, Screen, ScreenId, TransformMode};
use nav_stack::{Stack, StackEntry};

// =============================================================================
// Options
// =============================================================================

/// Options for a forward navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOptions {
    /// Cross-fade regardless of the screen's preferences
    pub force_fade: bool,
    /// Rewrite the stack once the navigation commits
    pub rebase: Option<RebaseMode>,
}

impl NavigateOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Cross-fade
    #[must_use]
    pub fn fade(mut self) -> Self {
        self.force_fade = true;
        self
    }

    /// Rebase on commit
    #[must_use]
    pub fn rebase(mut self, mode: RebaseMode) -> Self {
        self.rebase = Some(mode);
        self
    }
}

fn log_back(refusal: Option<Refusal>) {
    if let Some(reason) = refusal {
        tracing::debug!(%reason, "Back press consumed without effect");
    }
}

// =============================================================================
// Settled
// =============================================================================

/// View handed to settled listeners at the end of every transition
pub struct Settled<'a> {
    state: &'a TransitionState,
    mode: FinishMode,
    stack: &'a mut Stack,
    displaced: &'a mut Vec<StackEntry>,
}

impl Settled<'_> {
    /// The transition that just finished
    pub fn state(&self) -> &TransitionState {
        self.state
    }

    /// How it finished
    pub fn mode(&self) -> FinishMode {
        self.mode
    }

    /// The settled stack
    pub fn stack(&self) -> &Stack {
        &*self.stack
    }

    /// Replace everything below the top with `screens` (or everything, when
    /// `keep_top` is false). Returns `false` when the stack refused.
    pub fn rebase(&mut self, screens: Vec<Box<dyn Screen>>, keep_top: bool) -> bool {
        let entries = screens.into_iter().map(StackEntry::new).collect();
        match self.stack.rebase(entries, keep_top) {
            Ok(displaced) => {
                self.displaced.extend(displaced);
                true
            }
            Err(rejected) => {
                self.displaced.extend(rejected);
                false
            }
        }
    }
}

type SettledListener = Box<dyn FnMut(&mut Settled<'_>)>;

#[derive(Debug)]
struct PendingStart {
    token: ReadyToken,
    deadline_ms: u64,
    direction: Direction,
    options: NavigateOptions,
}

// =============================================================================
// Navigation Context
// =============================================================================

/// One navigation root: stack, transitions, peek and title bar modes
pub struct NavigationContext<S: Scene> {
    settings: NavigationSettings,
    viewport: Viewport,
    scene: S,
    stack: Stack,
    controller: TransitionController,
    incoming: Option<StackEntry>,
    pending_start: Option<PendingStart>,
    peek: Option<PeekSession>,
    title_bar: TitleBarTransform,
    attached: Vec<ScreenId>,
    now_ms: u64,
    listeners: Vec<SettledListener>,
    destroyed: bool,
}

impl<S: Scene> NavigationContext<S> {
    /// Create an empty navigation root
    pub fn new(scene: S, settings: NavigationSettings, viewport: Viewport) -> Self {
        let controller = TransitionController::new(&settings);
        Self {
            settings,
            viewport,
            scene,
            stack: Stack::new(),
            controller,
            incoming: None,
            pending_start: None,
            peek: None,
            title_bar: TitleBarTransform::new(),
            attached: Vec::new(),
            now_ms: 0,
            listeners: Vec::new(),
            destroyed: false,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Settings in use
    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Navigation root size
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The scene
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The scene, mutably
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Ordered screen ids, for hosts persisting the stack
    pub fn stack_ids(&self) -> Vec<ScreenId> {
        self.stack.ids()
    }

    /// Current screen
    pub fn current(&self) -> Option<&dyn Screen> {
        self.stack.current().map(StackEntry::screen)
    }

    /// Screen below the current one
    pub fn previous(&self) -> Option<&dyn Screen> {
        self.stack.previous().map(StackEntry::screen)
    }

    /// Current stack entry
    pub fn current_entry(&self) -> Option<&StackEntry> {
        self.stack.current()
    }

    /// Synthetic time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Whether a transition is scheduled, in flight or gesture-tracked
    pub fn is_animating(&self) -> bool {
        self.controller.is_active() || self.pending_start.is_some() || self.peek.is_some()
    }

    /// Whether a navigation request would be accepted now
    pub fn can_navigate(&self) -> bool {
        self.check_can_start().is_ok()
    }

    /// The transition in flight
    pub fn transition(&self) -> Option<&TransitionState> {
        self.controller.state()
    }

    /// The open peek session
    pub fn peek(&self) -> Option<&PeekSession> {
        self.peek.as_ref()
    }

    /// Title bar mode and factor of the current screen
    pub fn title_bar_state(&self) -> TitleBarState {
        if let Some(state) = self.title_bar.running_state() {
            return state;
        }
        self.stack
            .current()
            .map(|entry| TitleBarState::resting(entry.mode()))
            .unwrap_or(TitleBarState::resting(&ModeState::Normal))
    }

    /// Whether the context was shut down
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn check_can_start(&self) -> Result<()> {
        if self.destroyed {
            Err(Refusal::Destroyed)
        } else if self.is_animating() {
            Err(Refusal::Animating)
        } else if self.stack.is_locked() {
            Err(Refusal::StackLocked)
        } else if self.title_bar.is_running() {
            Err(Refusal::CurrentTransforming)
        } else {
            Ok(())
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Replace the whole stack with `screen`, without animation
    pub fn set_root(&mut self, screen: Box<dyn Screen>) -> std::result::Result<(), Refused> {
        let blocked = if self.destroyed {
            Some(Refusal::Destroyed)
        } else if self.is_animating() {
            Some(Refusal::Animating)
        } else if self.stack.is_locked() {
            Some(Refusal::StackLocked)
        } else {
            None
        };
        if let Some(reason) = blocked {
            tracing::debug!(%reason, "Set root ignored");
            return Err(Refused::new(reason, screen));
        }

        self.title_bar.clear();
        self.blur_current();
        for entry in self.stack.clear() {
            self.discard(entry);
        }
        self.install_root(StackEntry::new(screen));
        Ok(())
    }

    fn install_root(&mut self, mut entry: StackEntry) {
        let id = entry.id().clone();
        let chrome = entry.chrome();
        entry.screen_mut().on_prepare_to_show();
        self.scene.attach(&id, Placement::Above);
        entry.screen_mut().on_attach();
        self.attached.push(id.clone());
        self.scene.settle_header(&chrome);
        self.scene.set_status_bar(chrome.status_bar_color());
        self.scene.set_floating_action(FloatingActionFrame::settled(&chrome));
        if let Err(entry) = self.stack.push(entry) {
            tracing::error!(id = %entry.id(), "Root rejected by the stack");
            debug_assert!(false, "root rejected by an unlocked stack");
            self.discard(entry);
            return;
        }
        self.focus_current();
        tracing::debug!(%id, "Root installed");
    }

    /// Navigate forward to `screen`
    pub fn navigate_to(&mut self, screen: Box<dyn Screen>) -> std::result::Result<(), Refused> {
        self.navigate_with(screen, NavigateOptions::default())
    }

    /// Navigate forward to `screen` with `options`
    pub fn navigate_with(
        &mut self,
        screen: Box<dyn Screen>,
        options: NavigateOptions,
    ) -> std::result::Result<(), Refused> {
        if let Err(reason) = self.check_can_start() {
            tracing::debug!(id = %screen.id(), %reason, "Navigation ignored");
            return Err(Refused::new(reason, screen));
        }
        if self.stack.contains(screen.id()) {
            tracing::warn!(id = %screen.id(), "Screen id already on the stack");
        }
        if self.stack.is_empty() {
            self.install_root(StackEntry::new(screen));
            return Ok(());
        }

        let mut entry = StackEntry::new(screen);
        let hints = entry.screen().transition_hints();
        let chrome = entry.chrome();
        let direction = Direction::select(&hints, chrome.popup, options.force_fade, &self.settings);
        self.stack.set_locked(true);

        match entry.screen().readiness(hints.fast) {
            Readiness::Immediate => {
                self.incoming = Some(entry);
                self.begin_push(direction, options);
            }
            Readiness::Deferred { timeout_ms } => {
                let timeout = timeout_ms.unwrap_or_else(|| self.settings.async_timeout(hints.fast));
                let token = ReadyToken::new();
                tracing::debug!(id = %entry.id(), timeout, "Waiting for screen to get ready");
                entry.screen_mut().on_ready_requested(token);
                self.incoming = Some(entry);
                self.pending_start = Some(PendingStart {
                    token,
                    deadline_ms: self.now_ms.saturating_add(u64::from(timeout)),
                    direction,
                    options,
                });
            }
        }
        Ok(())
    }

    /// Report that the screen waiting behind `token` is ready.
    ///
    /// Returns `false` for tokens that no longer match a scheduled start.
    pub fn signal_ready(&mut self, token: ReadyToken) -> bool {
        match self.pending_start.take() {
            Some(pending) if pending.token == token => {
                tracing::debug!("Screen ready, starting transition");
                self.begin_push(pending.direction, pending.options);
                true
            }
            other => {
                self.pending_start = other;
                tracing::debug!("Stale ready token ignored");
                false
            }
        }
    }

    fn begin_push(&mut self, direction: Direction, options: NavigateOptions) {
        let Some(incoming) = self.incoming.as_mut() else {
            tracing::error!("Forward transition without an incoming screen");
            debug_assert!(false, "forward transition without an incoming screen");
            self.stack.set_locked(false);
            return;
        };
        let Some(current) = self.stack.current_mut() else {
            tracing::error!("Forward transition without a current screen");
            debug_assert!(false, "forward transition without a current screen");
            self.stack.set_locked(false);
            return;
        };

        if let Some(screen) = current.live_mut() {
            screen.on_blur();
        }
        if let Some(screen) = incoming.live_mut() {
            screen.on_prepare_to_show();
        }

        let hints = incoming.screen().transition_hints();
        let left = Side {
            id: current.id().clone(),
            chrome: current.chrome(),
        };
        let right = Side {
            id: incoming.id().clone(),
            chrome: incoming.chrome(),
        };
        let duration = direction.duration_ms(true, hints.fast, &self.settings);
        let delay = start_delay(&hints, left.chrome.popup, &self.settings);
        let right_id = right.id.clone();
        let left_attached = self.attached.contains(&left.id);

        let spec = TransitionSpec {
            left,
            right,
            direction,
            origin: Origin::Push {
                rebase: options.rebase,
            },
            viewport: self.viewport,
            left_attached,
        };
        if let Err(reason) = self.controller.prepare(&mut self.scene, spec) {
            tracing::error!(%reason, "Forward transition could not be prepared");
            debug_assert!(false, "prepare refused while the context was idle");
            self.stack.set_locked(false);
            return;
        }
        if let Some(screen) = incoming.live_mut() {
            screen.on_attach();
        }
        self.attached.push(right_id);
        self.controller
            .drive(FinishMode::Commit, duration, direction.curve(), delay);
    }

    /// Navigate back to the screen below the current one
    pub fn navigate_back(&mut self) -> Result<()> {
        if let Err(reason) = self.check_can_start() {
            tracing::debug!(%reason, "Back navigation ignored");
            return Err(reason);
        }
        if self.stack.is_empty() {
            return Err(Refusal::EmptyStack);
        }
        if !self.stack.can_go_back() {
            tracing::debug!(reason = "at root", "Back navigation ignored");
            return Err(Refusal::AtRoot);
        }

        self.stack.set_locked(true);
        let Some((left, right, hints)) = self.prepare_reveal() else {
            self.stack.set_locked(false);
            return Err(Refusal::EmptyStack);
        };
        let direction = Direction::select(&hints, right.chrome.popup, false, &self.settings);
        let duration = direction.duration_ms(false, hints.fast, &self.settings);
        let delay = start_delay(&hints, left.chrome.popup, &self.settings);
        self.start_reveal(left, right, direction, Origin::Pop)?;
        self.controller
            .drive(FinishMode::Commit, duration, direction.curve(), delay);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Stack Edits
    // -------------------------------------------------------------------------

    /// Insert `screen` at `index`, below the current screen, without animation.
    ///
    /// The screen stays out of the live tree until it is uncovered.
    pub fn insert_screen(
        &mut self,
        screen: Box<dyn Screen>,
        index: usize,
    ) -> std::result::Result<(), Refused> {
        if let Err(reason) = self.check_can_start() {
            tracing::debug!(id = %screen.id(), %reason, "Insert ignored");
            return Err(Refused::new(reason, screen));
        }
        if self.stack.is_empty() {
            return Err(Refused::new(Refusal::EmptyStack, screen));
        }
        if index > self.stack.current_index() {
            tracing::debug!(id = %screen.id(), index, "Insert above the current screen ignored");
            return Err(Refused::new(Refusal::OutOfBounds, screen));
        }
        if self.stack.contains(screen.id()) {
            tracing::warn!(id = %screen.id(), "Screen id already on the stack");
        }

        let backdrop = self.backdrop_id();
        if let Err(entry) = self.stack.insert(StackEntry::new(screen), index) {
            return Err(Refused::new(Refusal::StackLocked, entry.into_screen()));
        }
        self.reconcile_backdrop(backdrop);
        Ok(())
    }

    /// Remove and destroy screen `id`, which must be below the current one
    pub fn remove_screen(&mut self, id: &ScreenId) -> Result<()> {
        if let Err(reason) = self.check_can_start() {
            tracing::debug!(%id, %reason, "Remove ignored");
            return Err(reason);
        }
        let index = self.stack.find(id).ok_or(Refusal::UnknownScreen)?;
        if index == self.stack.current_index() {
            tracing::debug!(%id, "Removing the current screen ignored");
            return Err(Refusal::IsCurrent);
        }

        let backdrop = self.backdrop_id();
        let entry = self.stack.remove(index).ok_or(Refusal::StackLocked)?;
        self.discard(entry);
        self.reconcile_backdrop(backdrop);
        tracing::debug!(%id, depth = self.stack.len(), "Screen removed");
        Ok(())
    }

    /// Reorder the entries below the current screen
    pub fn move_screen(&mut self, from: usize, to: usize) -> Result<()> {
        if let Err(reason) = self.check_can_start() {
            tracing::debug!(from, to, %reason, "Move ignored");
            return Err(reason);
        }
        let current = self.stack.current_index();
        if from >= current || to >= current {
            tracing::debug!(from, to, current, "Move outside the history ignored");
            return Err(Refusal::OutOfBounds);
        }

        let backdrop = self.backdrop_id();
        if !self.stack.move_entry(from, to) {
            return Err(Refusal::StackLocked);
        }
        self.reconcile_backdrop(backdrop);
        Ok(())
    }

    fn backdrop_id(&self) -> Option<ScreenId> {
        self.stack.previous().map(|entry| entry.id().clone())
    }

    /// Keep the live tree in step after the screen below the current one
    /// changed: the old one leaves, and a popup gets its new backdrop.
    fn reconcile_backdrop(&mut self, before: Option<ScreenId>) {
        let after = self.backdrop_id();
        if before == after {
            return;
        }
        if let Some(old) = before {
            if self.attached.contains(&old) {
                if let Some(index) = self.stack.find(&old) {
                    self.scene.detach(&old);
                    if let Some(screen) = self.stack.get_mut(index).and_then(StackEntry::live_mut)
                    {
                        screen.on_detach();
                    }
                    self.attached.retain(|attached| *attached != old);
                }
            }
        }

        let popup = self.stack.current().is_some_and(|entry| entry.chrome().popup);
        let Some(new) = after else {
            return;
        };
        if !popup || self.attached.contains(&new) {
            return;
        }
        self.scene.attach(&new, Placement::Below);
        if let Some(screen) = self.stack.previous_mut().and_then(StackEntry::live_mut) {
            screen.on_prepare_to_show();
            screen.on_attach();
        }
        self.attached.push(new);
    }

    /// Blur/prepare hooks for uncovering the previous screen
    fn prepare_reveal(&mut self) -> Option<(Side, Side, nav_screen::TransitionHints)> {
        let current = self.stack.current()?;
        let right = Side {
            id: current.id().clone(),
            chrome: current.chrome(),
        };
        let hints = current.screen().transition_hints();
        let previous = self.stack.previous_mut()?;
        if let Some(screen) = previous.live_mut() {
            screen.on_prepare_to_show();
        }
        let left = Side {
            id: previous.id().clone(),
            chrome: previous.chrome(),
        };
        Some((left, right, hints))
    }

    fn start_reveal(
        &mut self,
        left: Side,
        right: Side,
        direction: Direction,
        origin: Origin,
    ) -> Result<()> {
        let left_id = left.id.clone();
        let left_attached = self.attached.contains(&left_id);
        let spec = TransitionSpec {
            left,
            right,
            direction,
            origin,
            viewport: self.viewport,
            left_attached,
        };
        if let Err(reason) = self.controller.prepare(&mut self.scene, spec) {
            self.stack.set_locked(false);
            return Err(reason);
        }
        if origin == Origin::Pop {
            self.blur_current();
        }
        if !left_attached {
            if let Some(screen) = self.stack.previous_mut().and_then(StackEntry::live_mut) {
                screen.on_attach();
            }
            self.attached.push(left_id);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Advance synthetic time by `delta_ms`
    pub fn tick(&mut self, delta_ms: u64) {
        if self.destroyed {
            return;
        }
        self.now_ms = self.now_ms.saturating_add(delta_ms);

        if let Some(pending) = self.pending_start.take() {
            if self.now_ms >= pending.deadline_ms {
                tracing::debug!("Screen readiness timed out, starting anyway");
                self.begin_push(pending.direction, pending.options);
            } else {
                self.pending_start = Some(pending);
            }
            return;
        }

        if self.controller.is_driving() {
            if let Some(mode) = self.controller.tick(&mut self.scene, delta_ms) {
                self.complete(mode);
            }
            return;
        }

        if let Some(step) = self.title_bar.tick(&mut self.scene, delta_ms) {
            self.on_mode_step(step);
        }
    }

    // -------------------------------------------------------------------------
    // Finish
    // -------------------------------------------------------------------------

    fn complete(&mut self, mode: FinishMode) {
        let Some(finished) = self.controller.finish(&mut self.scene, mode) else {
            return;
        };
        let Finished {
            state, detached, ..
        } = finished;

        self.peek = None;
        self.stack.set_locked(false);
        if let Some(id) = &detached {
            self.attached.retain(|attached| attached != id);
        }
        let left_detached = detached.as_ref() == Some(state.left());

        match (state.origin(), mode) {
            (Origin::Push { rebase }, FinishMode::Commit) => {
                if left_detached {
                    if let Some(screen) = self.stack.current_mut().and_then(StackEntry::live_mut) {
                        screen.on_detach();
                    }
                }
                if let Some(incoming) = self.incoming.take() {
                    if let Err(entry) = self.stack.push(incoming) {
                        tracing::error!(id = %entry.id(), "Committed screen rejected by the stack");
                        debug_assert!(false, "committed screen rejected by an unlocked stack");
                        self.discard(entry);
                    }
                }
                self.focus_current();
                if let Some(rebase) = rebase {
                    self.stack.set_settling(true);
                    self.apply_rebase(rebase);
                    self.stack.set_settling(false);
                }
            }
            (Origin::Push { .. }, FinishMode::Cancel) => {
                if let Some(mut incoming) = self.incoming.take() {
                    if let Some(screen) = incoming.live_mut() {
                        screen.on_detach();
                    }
                    incoming.mark_destroyed();
                }
                self.focus_current();
            }
            (Origin::Pop | Origin::Peek, FinishMode::Commit) => {
                if let Some(mut right) = self.stack.remove_by_id(state.right()) {
                    if let Some(screen) = right.live_mut() {
                        if state.origin() == Origin::Peek {
                            screen.on_blur();
                        }
                        screen.on_detach();
                    }
                    right.mark_destroyed();
                }
                self.focus_current();
            }
            (Origin::Pop | Origin::Peek, FinishMode::Cancel) => {
                if left_detached {
                    if let Some(screen) = self.stack.previous_mut().and_then(StackEntry::live_mut) {
                        screen.on_detach();
                    }
                }
                if state.origin() == Origin::Pop {
                    self.focus_current();
                }
            }
        }

        for entry in self.stack.purge_destroyed() {
            self.discard(entry);
        }
        self.stack.set_settling(true);
        self.run_settled_listeners(&state, mode);
        self.stack.set_settling(false);
        self.ensure_current_attached();
        debug_assert!(self.stack.is_empty() || self.stack.current_index() < self.stack.len());

        tracing::debug!(
            origin = ?state.origin(),
            ?mode,
            depth = self.stack.len(),
            "Navigation settled"
        );
        self.apply_deferred_mode();
    }

    fn apply_rebase(&mut self, mode: RebaseMode) {
        let result = match mode {
            RebaseMode::DropHistory => self.stack.rebase(Vec::new(), true),
            RebaseMode::KeepRoot => {
                if self.stack.len() <= 2 {
                    return;
                }
                match self.stack.remove(0) {
                    Some(root) => self.stack.rebase(vec![root], true),
                    None => return,
                }
            }
        };
        match result {
            Ok(displaced) => {
                for entry in displaced {
                    self.discard(entry);
                }
            }
            Err(entries) => {
                tracing::error!(count = entries.len(), "Rebase rejected by the stack");
                for entry in entries {
                    self.discard(entry);
                }
            }
        }
    }

    fn run_settled_listeners(&mut self, state: &TransitionState, mode: FinishMode) {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        let mut displaced = Vec::new();
        {
            let mut settled = Settled {
                state,
                mode,
                stack: &mut self.stack,
                displaced: &mut displaced,
            };
            for listener in listeners.iter_mut() {
                listener(&mut settled);
            }
        }
        self.listeners = listeners;
        for entry in displaced {
            self.discard(entry);
        }
    }

    /// A rebase without top leaves an unattached current screen
    fn ensure_current_attached(&mut self) {
        let Some(current) = self.stack.current_mut() else {
            return;
        };
        let id = current.id().clone();
        if self.attached.contains(&id) {
            return;
        }
        let chrome = current.chrome();
        self.scene.attach(&id, Placement::Above);
        if let Some(screen) = current.live_mut() {
            screen.on_prepare_to_show();
            screen.on_attach();
            screen.on_focus();
        }
        self.attached.push(id);
        self.scene.settle_header(&chrome);
        self.scene.set_status_bar(chrome.status_bar_color());
        self.scene.set_floating_action(FloatingActionFrame::settled(&chrome));
    }

    fn focus_current(&mut self) {
        if let Some(screen) = self.stack.current_mut().and_then(StackEntry::live_mut) {
            screen.on_focus();
        }
    }

    fn blur_current(&mut self) {
        if let Some(screen) = self.stack.current_mut().and_then(StackEntry::live_mut) {
            screen.on_blur();
        }
    }

    /// Detach (when attached) and destroy an entry leaving the stack.
    ///
    /// A dropped duplicate shares its id with a live entry, whose view stays.
    fn discard(&mut self, mut entry: StackEntry) {
        let id = entry.id().clone();
        if self.attached.contains(&id) && !self.stack.contains(&id) {
            self.scene.detach(&id);
            if let Some(screen) = entry.live_mut() {
                screen.on_detach();
            }
            self.attached.retain(|attached| *attached != id);
        }
        entry.mark_destroyed();
    }

    // -------------------------------------------------------------------------
    // Peek
    // -------------------------------------------------------------------------

    /// Start previewing the screen below the current one
    pub fn open_preview(&mut self) -> Result<()> {
        if let Err(reason) = self.check_can_start() {
            tracing::debug!(%reason, "Peek ignored");
            return Err(reason);
        }
        let Some(current) = self.stack.current() else {
            return Err(Refusal::EmptyStack);
        };
        if current.is_destroyed() {
            return Err(Refusal::Destroyed);
        }
        if !self.stack.can_go_back() {
            tracing::debug!(reason = "at root", "Peek ignored");
            return Err(Refusal::AtRoot);
        }

        self.stack.set_locked(true);
        let Some((left, right, _)) = self.prepare_reveal() else {
            self.stack.set_locked(false);
            return Err(Refusal::EmptyStack);
        };
        let vertical = right.chrome.popup;
        let (direction, extent) = if vertical {
            (Direction::Vertical, self.viewport.height)
        } else {
            (Direction::Horizontal, self.viewport.width)
        };
        let session = PeekSession::new(right.id.clone(), left.id.clone(), extent, vertical);
        self.start_reveal(left, right, direction, Origin::Peek)?;
        tracing::debug!(anchor = %session.anchor(), vertical, "Peek opened");
        self.peek = Some(session);
        Ok(())
    }

    /// Follow the gesture; returns the new progress
    pub fn drag_preview(&mut self, offset: f32) -> Result<f32> {
        let session = self.peek.as_mut().ok_or(Refusal::NoPeekSession)?;
        let progress = session.drag(offset).ok_or(Refusal::PeekResolving)?;
        self.controller.set_progress(&mut self.scene, progress);
        Ok(progress)
    }

    /// Release the gesture with `velocity` (px/s, positive towards revealing)
    pub fn release_preview(&mut self, velocity: f32) -> Result<PeekResolution> {
        self.resolve_preview(None, velocity)
    }

    /// Commit the preview without a gesture
    pub fn apply_preview(&mut self) -> Result<PeekResolution> {
        self.resolve_preview(Some(FinishMode::Commit), 0.0)
    }

    /// Cancel the preview without a gesture
    pub fn close_preview(&mut self) -> Result<PeekResolution> {
        self.resolve_preview(Some(FinishMode::Cancel), 0.0)
    }

    fn resolve_preview(&mut self, forced: Option<FinishMode>, velocity: f32) -> Result<PeekResolution> {
        let session = self.peek.as_mut().ok_or(Refusal::NoPeekSession)?;
        if session.is_resolving() {
            return Err(Refusal::PeekResolving);
        }

        let progress = self.controller.progress().unwrap_or(0.0);
        let direction = self
            .controller
            .state()
            .map(TransitionState::direction)
            .unwrap_or(Direction::None);
        if forced != Some(FinishMode::Commit)
            && (progress <= 0.0 || direction == Direction::None)
        {
            let resolution = session.resolve_as(FinishMode::Cancel, 0.0, &self.settings);
            let resolution = PeekResolution {
                duration_ms: 0,
                ..resolution
            };
            self.complete(FinishMode::Cancel);
            return Ok(resolution);
        }

        let resolution = match forced {
            Some(mode) => session.resolve_as(mode, velocity, &self.settings),
            None => session.release(velocity, &self.settings),
        };
        self.controller
            .drive(resolution.mode, resolution.duration_ms, Curve::DECELERATE, 0);
        Ok(resolution)
    }

    /// Snap an open preview to its resolved end state without animating.
    ///
    /// Active sessions cancel; released ones finish the way they resolved.
    pub fn force_close_preview(&mut self) -> bool {
        let Some(session) = self.peek.as_ref() else {
            return false;
        };
        let mode = match session.committed() {
            Some(true) => FinishMode::Commit,
            _ => FinishMode::Cancel,
        };
        tracing::debug!(?mode, "Peek force-closed");
        self.complete(mode);
        true
    }

    // -------------------------------------------------------------------------
    // Title Bar Modes
    // -------------------------------------------------------------------------

    /// Mode the current title bar will rest in once any transform ends
    fn effective_mode(&self) -> Option<TransformMode> {
        if self.title_bar.is_closing() {
            return None;
        }
        self.stack.current().and_then(|entry| entry.mode().mode())
    }

    /// Enter a title bar mode on the current screen
    pub fn enter_mode(&mut self, mode: TransformMode, initial_count: usize) -> Result<ModeOutcome> {
        if self.destroyed {
            return Err(Refusal::Destroyed);
        }
        let current = self.stack.current().ok_or(Refusal::EmptyStack)?;
        if current.is_destroyed() {
            return Err(Refusal::Destroyed);
        }
        let id = current.id().clone();
        if let Some(active) = self.effective_mode() {
            tracing::debug!(%id, ?active, requested = ?mode, "Mode entry ignored");
            return Err(Refusal::ModeConflict);
        }
        if self.is_animating() || self.title_bar.is_running() {
            self.title_bar
                .defer(id, ModeRequest::Enter { mode, initial_count })?;
            return Ok(ModeOutcome::Deferred);
        }

        let Some(entry) = self.stack.current_mut() else {
            return Err(Refusal::EmptyStack);
        };
        let state = ModeState::entering(mode, initial_count);
        let normal = entry.screen().mode_chrome(&ModeState::Normal);
        entry.set_mode(state);
        entry.screen_mut().on_enter_mode(&state);
        let transformed = entry.chrome();
        let duration = entry.screen().mode_transform_duration_ms(mode);
        self.title_bar
            .start(id, mode, true, &normal, &transformed, duration);
        Ok(ModeOutcome::Started)
    }

    /// Leave a title bar mode on the current screen
    pub fn leave_mode(&mut self, mode: TransformMode) -> Result<ModeOutcome> {
        if self.destroyed {
            return Err(Refusal::Destroyed);
        }
        let current = self.stack.current().ok_or(Refusal::EmptyStack)?;
        let id = current.id().clone();
        if self.effective_mode() != Some(mode) {
            tracing::debug!(%id, ?mode, "Mode exit ignored");
            return Err(Refusal::NotInMode);
        }
        if self.is_animating() || self.title_bar.is_running() {
            self.title_bar.defer(id, ModeRequest::Leave(mode))?;
            return Ok(ModeOutcome::Deferred);
        }

        let Some(entry) = self.stack.current_mut() else {
            return Err(Refusal::EmptyStack);
        };
        let normal = entry.screen().mode_chrome(&ModeState::Normal);
        let transformed = entry.chrome();
        let duration = entry.screen().mode_transform_duration_ms(mode);
        self.title_bar
            .start(id, mode, false, &normal, &transformed, duration);
        Ok(ModeOutcome::Started)
    }

    /// Enter select mode with `count` selected items
    pub fn enter_select_mode(&mut self, count: usize) -> Result<ModeOutcome> {
        self.enter_mode(TransformMode::Select, count)
    }

    /// Enter search mode
    pub fn enter_search_mode(&mut self) -> Result<ModeOutcome> {
        self.enter_mode(TransformMode::Search, 0)
    }

    /// Enter the screen-defined custom mode
    pub fn enter_custom_mode(&mut self) -> Result<ModeOutcome> {
        self.enter_mode(TransformMode::Custom, 0)
    }

    /// Update the selection counter in select mode
    pub fn set_selected_count(&mut self, count: usize) -> Result<()> {
        let animating = self.is_animating();
        let entry = self.stack.current_mut().ok_or(Refusal::EmptyStack)?;
        if !entry.mode().in_select_mode() {
            return Err(Refusal::NotInMode);
        }
        entry.set_mode(ModeState::Select { count });
        let chrome = entry.chrome();
        let id = entry.id().clone();
        if self.title_bar.running_screen() == Some(&id) {
            self.title_bar.retarget(&mut self.scene, &chrome);
        } else if !animating {
            self.scene.settle_header(&chrome);
        }
        Ok(())
    }

    fn on_mode_step(&mut self, step: ModeStep) {
        if let Some(index) = self.stack.find(&step.screen) {
            if let Some(entry) = self.stack.get_mut(index) {
                if !entry.is_destroyed() {
                    entry
                        .screen_mut()
                        .apply_mode_factor(step.mode, step.factor, step.opening);
                }
                if step.finished && !step.opening {
                    entry.set_mode(ModeState::Normal);
                    if !entry.is_destroyed() {
                        entry.screen_mut().on_leave_mode(step.mode);
                    }
                }
            }
        }
        if step.finished {
            self.apply_deferred_mode();
        }
    }

    fn apply_deferred_mode(&mut self) {
        let Some((screen, request)) = self.title_bar.take_deferred() else {
            return;
        };
        let current = self.stack.current().map(|entry| entry.id().clone());
        if current.as_ref() != Some(&screen) {
            tracing::debug!(%screen, ?request, "Deferred title bar request dropped");
            return;
        }
        let result = match request {
            ModeRequest::Enter { mode, initial_count } => self.enter_mode(mode, initial_count),
            ModeRequest::Leave(mode) => self.leave_mode(mode),
        };
        if let Err(reason) = result {
            tracing::debug!(%screen, ?request, %reason, "Deferred title bar request refused");
        }
    }

    // -------------------------------------------------------------------------
    // Host Events
    // -------------------------------------------------------------------------

    /// Handle a back press; returns whether it was consumed.
    ///
    /// An open mode closes first, then the current screen gets the event, then
    /// the stack pops.
    pub fn on_back_pressed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(entry) = self.stack.current_mut() else {
            return false;
        };
        // A destroyed screen neither closes its mode nor sees the press
        if !entry.is_destroyed() {
            match *entry.mode() {
                ModeState::Select { .. } => {
                    log_back(self.leave_mode(TransformMode::Select).err());
                    return true;
                }
                ModeState::Search => {
                    if entry.screen_mut().close_search_on_back() {
                        log_back(self.leave_mode(TransformMode::Search).err());
                    }
                    return true;
                }
                ModeState::Custom => {
                    log_back(self.leave_mode(TransformMode::Custom).err());
                    return true;
                }
                ModeState::Normal => {}
            }
            if entry.screen_mut().on_back_pressed() {
                return true;
            }
        }
        if self.stack.len() > 1 {
            log_back(self.navigate_back().err());
            return true;
        }
        false
    }

    /// Register a listener run at the end of every transition
    pub fn on_settled<F>(&mut self, listener: F)
    where
        F: FnMut(&mut Settled<'_>) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// The host window gained focus
    pub fn focus(&mut self) {
        if self.destroyed || self.is_animating() {
            return;
        }
        self.focus_current();
    }

    /// The host window lost focus
    pub fn blur(&mut self) {
        if self.destroyed || self.is_animating() {
            return;
        }
        self.blur_current();
    }

    /// Resize the navigation root
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.controller.set_viewport(&mut self.scene, viewport);
    }

    /// Destroy screen `id`. Returns `false` when it is unknown or already
    /// destroyed.
    ///
    /// A screen on the stack taking part in a transition stays in place until
    /// it settles. Destroying the current screen force-closes an open preview
    /// first. Destroying the screen being pushed cancels the push.
    pub fn destroy_screen(&mut self, id: &ScreenId) -> bool {
        if self.destroyed {
            return false;
        }
        if self.incoming.as_ref().is_some_and(|incoming| incoming.id() == id) {
            return self.destroy_incoming();
        }
        let Some(index) = self.stack.find(id) else {
            return false;
        };
        let is_current = index == self.stack.current_index();
        if is_current && self.peek.is_some() {
            self.force_close_preview();
        }
        if self.title_bar.running_screen() == Some(id) {
            self.title_bar.clear();
        }

        // A committed preview already destroyed its anchor
        let Some(index) = self.stack.find(id) else {
            return true;
        };
        let Some(entry) = self.stack.get_mut(index) else {
            return false;
        };
        if !entry.mark_destroyed() {
            return false;
        }
        tracing::debug!(%id, is_current, "Screen destroyed");

        if !is_current && !self.is_animating() {
            if let Some(entry) = self.stack.remove(index) {
                self.discard(entry);
            }
        }
        true
    }

    fn destroy_incoming(&mut self) -> bool {
        let Some(incoming) = self.incoming.as_mut() else {
            return false;
        };
        if !incoming.mark_destroyed() {
            return false;
        }
        tracing::debug!(id = %incoming.id(), "Incoming screen destroyed, push cancelled");

        if self.pending_start.take().is_some() {
            if let Some(entry) = self.incoming.take() {
                self.discard(entry);
            }
            self.stack.set_locked(false);
            self.apply_deferred_mode();
        } else if self.controller.is_active() {
            self.complete(FinishMode::Cancel);
        }
        true
    }

    /// Cancel everything and destroy every screen once
    pub fn shutdown(&mut self) {
        if self.destroyed {
            return;
        }
        if self.pending_start.take().is_some() {
            tracing::debug!("Scheduled transition start cancelled");
            if let Some(incoming) = self.incoming.take() {
                self.stack.set_locked(false);
                self.discard(incoming);
            }
        }
        if self.peek.is_some() {
            self.force_close_preview();
        }
        if self.controller.is_active() {
            self.complete(FinishMode::Cancel);
        }
        self.title_bar.clear();
        self.stack.set_locked(false);

        self.blur_current();
        for entry in self.stack.clear() {
            self.discard(entry);
        }
        self.listeners.clear();
        self.destroyed = true;
        tracing::debug!("Navigation context shut down");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use nav_screen::{Chrome, Title};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct TestScreen {
        id: ScreenId,
        chrome: Chrome,
        log: Log,
        readiness: Readiness,
        token: Rc<Cell<Option<ReadyToken>>>,
    }

    impl TestScreen {
        fn new(id: &str, log: &Log) -> Self {
            Self {
                id: ScreenId::new(id),
                chrome: Chrome::titled(id),
                log: log.clone(),
                readiness: Readiness::Immediate,
                token: Rc::new(Cell::new(None)),
            }
        }

        fn popup(mut self) -> Self {
            self.chrome = self.chrome.as_popup();
            self
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.id, event));
        }
    }

    impl Screen for TestScreen {
        fn id(&self) -> &ScreenId {
            &self.id
        }

        fn chrome(&self) -> Chrome {
            self.chrome.clone()
        }

        fn readiness(&self, _fast: bool) -> Readiness {
            self.readiness
        }

        fn on_ready_requested(&mut self, token: ReadyToken) {
            self.token.set(Some(token));
        }

        fn on_attach(&mut self) {
            self.record("attach");
        }

        fn on_detach(&mut self) {
            self.record("detach");
        }

        fn on_focus(&mut self) {
            self.record("focus");
        }

        fn on_blur(&mut self) {
            self.record("blur");
        }

        fn on_destroy(&mut self) {
            self.record("destroy");
        }

        fn on_leave_mode(&mut self, _mode: TransformMode) {
            self.record("leave");
        }
    }

    fn context() -> NavigationContext<RecordingScene> {
        NavigationContext::new(
            RecordingScene::new(),
            NavigationSettings::default(),
            Viewport::default(),
        )
    }

    fn screen(id: &str, log: &Log) -> Box<dyn Screen> {
        Box::new(TestScreen::new(id, log))
    }

    fn run(nav: &mut NavigationContext<RecordingScene>, ms: u64) {
        let mut elapsed = 0;
        while elapsed < ms {
            nav.tick(16);
            elapsed += 16;
        }
    }

    fn ids(names: &[&str]) -> Vec<ScreenId> {
        names.iter().map(|name| ScreenId::new(*name)).collect()
    }

    fn count(log: &Log, event: &str) -> usize {
        log.borrow().iter().filter(|entry| entry.as_str() == event).count()
    }

    fn with_stack(names: &[&str], log: &Log) -> NavigationContext<RecordingScene> {
        let mut nav = context();
        for name in names {
            nav.navigate_to(screen(name, log)).unwrap();
            run(&mut nav, 1000);
        }
        nav
    }

    #[test]
    fn test_push_settles_on_new_screen() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        nav.navigate_to(screen("b", &log)).unwrap();
        assert!(nav.is_animating());
        assert!(!nav.can_navigate());
        assert_eq!(nav.stack_ids(), ids(&["a"]));

        run(&mut nav, 1000);
        assert!(!nav.is_animating());
        assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
        assert_eq!(nav.scene().attached(), ids(&["b"]).as_slice());
        assert_eq!(count(&log, "a:blur"), 1);
        assert_eq!(count(&log, "a:detach"), 1);
        assert_eq!(count(&log, "b:focus"), 1);
        assert_eq!(nav.scene().settled_header().unwrap().title, Title::Text("b".into()));
    }

    #[test]
    fn test_navigation_is_single_flight() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        nav.navigate_to(screen("b", &log)).unwrap();
        let refused = nav.navigate_to(screen("c", &log)).unwrap_err();
        assert_eq!(refused.reason(), Refusal::Animating);
        assert_eq!(refused.into_screen().id(), &ScreenId::new("c"));
        assert_eq!(nav.navigate_back(), Err(Refusal::Animating));
        assert_eq!(nav.open_preview(), Err(Refusal::Animating));

        run(&mut nav, 1000);
        assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
    }

    #[test]
    fn test_back_pops_and_destroys_once() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        nav.navigate_back().unwrap();
        assert!(nav.scene().is_attached(&ScreenId::new("a")));
        run(&mut nav, 1000);

        assert_eq!(nav.stack_ids(), ids(&["a"]));
        assert_eq!(count(&log, "b:destroy"), 1);
        assert_eq!(count(&log, "a:focus"), 2);
        assert_eq!(nav.scene().attached(), ids(&["a"]).as_slice());
        assert_eq!(nav.navigate_back(), Err(Refusal::AtRoot));
    }

    #[test]
    fn test_popup_keeps_screen_below_attached() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        nav.navigate_to(Box::new(TestScreen::new("sheet", &log).popup()))
            .unwrap();
        assert_eq!(
            nav.transition().map(TransitionState::direction),
            Some(Direction::Vertical)
        );
        run(&mut nav, 1000);
        assert!(nav.scene().is_attached(&ScreenId::new("a")));
        assert_eq!(count(&log, "a:detach"), 0);

        nav.navigate_back().unwrap();
        run(&mut nav, 1000);
        assert_eq!(nav.scene().attached(), ids(&["a"]).as_slice());
        assert_eq!(count(&log, "a:attach"), 1);
    }

    #[test]
    fn test_deferred_start_waits_for_token() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        let mut slow = TestScreen::new("b", &log);
        slow.readiness = Readiness::Deferred {
            timeout_ms: Some(300),
        };
        let token = slow.token.clone();
        nav.navigate_to(Box::new(slow)).unwrap();

        run(&mut nav, 100);
        assert!(nav.is_animating());
        assert!(nav.transition().is_none());
        assert!(!nav.signal_ready(ReadyToken::new()));

        let token = token.get().unwrap();
        assert!(nav.signal_ready(token));
        assert!(nav.transition().is_some());
        assert!(!nav.signal_ready(token));
        run(&mut nav, 1000);
        assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
    }

    #[test]
    fn test_deferred_start_times_out() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        let mut slow = TestScreen::new("b", &log);
        slow.readiness = Readiness::Deferred {
            timeout_ms: Some(300),
        };
        nav.navigate_to(Box::new(slow)).unwrap();
        run(&mut nav, 288);
        assert!(nav.transition().is_none());
        run(&mut nav, 16);
        assert!(nav.transition().is_some());
    }

    #[test]
    fn test_peek_commit_pops() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        nav.open_preview().unwrap();
        assert!(nav.scene().is_attached(&ScreenId::new("a")));
        let progress = nav.drag_preview(252.0).unwrap();
        assert!((progress - 0.7).abs() < 1e-6);

        let resolution = nav.release_preview(0.0).unwrap();
        assert_eq!(resolution.mode, FinishMode::Commit);
        assert_eq!(nav.drag_preview(10.0), Err(Refusal::PeekResolving));
        run(&mut nav, 500);

        assert!(nav.peek().is_none());
        assert_eq!(nav.stack_ids(), ids(&["a"]));
        assert_eq!(count(&log, "b:destroy"), 1);
    }

    #[test]
    fn test_peek_cancel_restores_stack() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        nav.open_preview().unwrap();
        nav.drag_preview(60.0).unwrap();
        let resolution = nav.release_preview(0.0).unwrap();
        assert_eq!(resolution.mode, FinishMode::Cancel);
        run(&mut nav, 500);

        assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
        assert_eq!(nav.scene().attached(), ids(&["b"]).as_slice());
        assert_eq!(count(&log, "b:destroy"), 0);
        assert!(nav.can_navigate());
    }

    #[test]
    fn test_release_without_drag_cancels_immediately() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        nav.open_preview().unwrap();
        let resolution = nav.release_preview(0.0).unwrap();
        assert_eq!(resolution.mode, FinishMode::Cancel);
        assert_eq!(resolution.duration_ms, 0);
        assert!(!nav.is_animating());
        assert_eq!(nav.release_preview(0.0), Err(Refusal::NoPeekSession));
    }

    #[test]
    fn test_select_mode_lifecycle() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        assert_eq!(nav.enter_select_mode(1), Ok(ModeOutcome::Started));
        assert!(!nav.can_navigate());
        run(&mut nav, 400);
        assert_eq!(
            nav.title_bar_state(),
            TitleBarState {
                mode: Some(TransformMode::Select),
                factor: 1.0
            }
        );
        assert_eq!(nav.scene().settled_header().unwrap().title, Title::Counter(1));

        nav.set_selected_count(3).unwrap();
        assert_eq!(nav.scene().settled_header().unwrap().title, Title::Counter(3));
        assert_eq!(nav.enter_search_mode(), Err(Refusal::ModeConflict));

        assert!(nav.on_back_pressed());
        run(&mut nav, 400);
        assert_eq!(nav.title_bar_state().mode, None);
        assert_eq!(count(&log, "a:leave"), 1);
        assert_eq!(nav.set_selected_count(2), Err(Refusal::NotInMode));
        assert_eq!(nav.scene().settled_header().unwrap().title, Title::Text("a".into()));
    }

    #[test]
    fn test_leave_while_opening_is_deferred() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        nav.enter_custom_mode().unwrap();
        assert_eq!(
            nav.leave_mode(TransformMode::Custom),
            Ok(ModeOutcome::Deferred)
        );
        run(&mut nav, 1000);
        assert_eq!(nav.title_bar_state().mode, None);
        assert_eq!(count(&log, "a:leave"), 1);
    }

    #[test]
    fn test_deferred_mode_follows_its_screen() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        nav.navigate_to(screen("b", &log)).unwrap();
        assert_eq!(nav.enter_search_mode(), Ok(ModeOutcome::Deferred));
        run(&mut nav, 1000);
        assert_eq!(nav.title_bar_state().mode, None);
        assert_eq!(nav.current_entry().unwrap().mode(), &ModeState::Normal);
    }

    #[test]
    fn test_rebase_drops_history() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        nav.navigate_with(
            screen("c", &log),
            NavigateOptions::new().rebase(RebaseMode::DropHistory),
        )
        .unwrap();
        run(&mut nav, 1000);
        assert_eq!(nav.stack_ids(), ids(&["c"]));
        assert_eq!(count(&log, "a:destroy"), 1);
        assert_eq!(count(&log, "b:destroy"), 1);
    }

    #[test]
    fn test_rebase_keeps_root() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b", "c"], &log);
        nav.navigate_with(screen("d", &log), NavigateOptions::new().rebase(RebaseMode::KeepRoot))
            .unwrap();
        run(&mut nav, 1000);
        assert_eq!(nav.stack_ids(), ids(&["a", "d"]));
        assert_eq!(count(&log, "a:destroy"), 0);
        assert_eq!(count(&log, "c:destroy"), 1);
    }

    #[test]
    fn test_settled_listener_can_rebase() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        nav.on_settled(move |settled| {
            seen.set(seen.get() + 1);
            if settled.state().forward() && settled.mode() == FinishMode::Commit {
                assert!(settled.rebase(Vec::new(), true));
            }
        });
        nav.navigate_to(screen("c", &log)).unwrap();
        run(&mut nav, 1000);
        assert_eq!(calls.get(), 1);
        assert_eq!(nav.stack_ids(), ids(&["c"]));
        assert_eq!(count(&log, "b:destroy"), 1);
    }

    #[test]
    fn test_idle_rebase_is_refused() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        let entries = vec![StackEntry::new(screen("x", &log)), StackEntry::new(screen("y", &log))];
        let rejected = nav.stack.rebase(entries, true).unwrap_err();
        assert_eq!(rejected.len(), 2);
        assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
        assert!(nav.can_navigate());
    }

    #[test]
    fn test_destroy_screen_below_current() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b", "c"], &log);
        assert!(nav.destroy_screen(&ScreenId::new("b")));
        assert!(!nav.destroy_screen(&ScreenId::new("b")));
        assert_eq!(nav.stack_ids(), ids(&["a", "c"]));
        assert_eq!(count(&log, "b:destroy"), 1);
        assert!(!nav.destroy_screen(&ScreenId::new("missing")));
    }

    #[test]
    fn test_back_press_at_root_is_not_consumed() {
        let log = Log::default();
        let mut nav = with_stack(&["a"], &log);
        assert!(!nav.on_back_pressed());
        let mut nav = with_stack(&["a", "b"], &log);
        assert!(nav.on_back_pressed());
        run(&mut nav, 1000);
        assert_eq!(nav.stack_ids(), ids(&["a"]));
    }

    #[test]
    fn test_shutdown_destroys_everything_once() {
        let log = Log::default();
        let mut nav = with_stack(&["a", "b"], &log);
        nav.navigate_to(screen("c", &log)).unwrap();
        run(&mut nav, 100);
        nav.shutdown();
        nav.shutdown();

        for id in ["a", "b", "c"] {
            assert_eq!(count(&log, &format!("{}:destroy", id)), 1, "{}", id);
        }
        assert!(nav.scene().attached().is_empty());
        assert!(nav.stack().is_empty());
        let refused = nav.navigate_to(screen("d", &log)).unwrap_err();
        assert_eq!(refused.reason(), Refusal::Destroyed);
    }
}
