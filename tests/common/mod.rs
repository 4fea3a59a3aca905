//! Shared fixtures for the integration tests

#![allow(dead_code)]

use navshell::{
    Chrome, NavigationContext, NavigationSettings, ReadyToken, Readiness, RecordingScene, Screen,
    ScreenId, TransformMode, Viewport,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared lifecycle log, entries formatted as `id:event`
pub type Log = Rc<RefCell<Vec<String>>>;

/// Screen that records every hook it receives
pub struct TestScreen {
    pub id: ScreenId,
    pub chrome: Chrome,
    pub log: Log,
    pub readiness: Readiness,
    pub token: Rc<Cell<Option<ReadyToken>>>,
    pub factors: Rc<RefCell<Vec<f32>>>,
    pub consume_back: bool,
    pub close_search_on_back: bool,
}

impl TestScreen {
    pub fn new(id: &str, log: &Log) -> Self {
        Self {
            id: ScreenId::new(id),
            chrome: Chrome::titled(id),
            log: log.clone(),
            readiness: Readiness::Immediate,
            token: Rc::new(Cell::new(None)),
            factors: Rc::new(RefCell::new(Vec::new())),
            consume_back: false,
            close_search_on_back: true,
        }
    }

    pub fn popup(mut self) -> Self {
        self.chrome = self.chrome.as_popup();
        self
    }

    pub fn boxed(self) -> Box<dyn Screen> {
        Box::new(self)
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

    fn on_prepare_to_show(&mut self) {
        self.record("prepare");
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

    fn on_back_pressed(&mut self) -> bool {
        self.record("back");
        self.consume_back
    }

    fn close_search_on_back(&mut self) -> bool {
        self.close_search_on_back
    }

    fn on_enter_mode(&mut self, mode: &navshell::ModeState) {
        self.record(&format!("enter-{:?}", mode.mode()));
    }

    fn on_leave_mode(&mut self, mode: TransformMode) {
        self.record(&format!("leave-{:?}", mode));
    }

    fn apply_mode_factor(&mut self, _mode: TransformMode, factor: f32, _opening: bool) {
        self.factors.borrow_mut().push(factor);
    }
}

pub fn context() -> NavigationContext<RecordingScene> {
    context_with(NavigationSettings::default())
}

pub fn context_with(settings: NavigationSettings) -> NavigationContext<RecordingScene> {
    NavigationContext::new(RecordingScene::new(), settings, Viewport::new(360.0, 640.0))
}

/// Context whose stack holds `names`, bottom first, fully settled
pub fn settled_stack(names: &[&str], log: &Log) -> NavigationContext<RecordingScene> {
    let mut nav = context();
    for name in names {
        nav.navigate_to(TestScreen::new(name, log).boxed()).unwrap();
        run(&mut nav, 1000);
    }
    nav
}

/// Feed `ms` of synthetic time in 16ms frames
pub fn run(nav: &mut NavigationContext<RecordingScene>, ms: u64) {
    let mut elapsed = 0;
    while elapsed < ms {
        nav.tick(16);
        elapsed += 16;
    }
}

pub fn ids(names: &[&str]) -> Vec<ScreenId> {
    names.iter().map(|name| ScreenId::new(*name)).collect()
}

pub fn count(log: &Log, event: &str) -> usize {
    log.borrow().iter().filter(|entry| entry.as_str() == event).count()
}

/// Events logged for screen `id` after its `id:destroy` entry
pub fn events_after_destroy(log: &Log, id: &str) -> Vec<String> {
    let marker = format!("{}:destroy", id);
    let prefix = format!("{}:", id);
    log.borrow()
        .iter()
        .skip_while(|entry| **entry != marker)
        .skip(1)
        .filter(|entry| entry.starts_with(&prefix))
        .cloned()
        .collect()
}
