//! Title Bar Mode Tests
//!
//! End-to-end tests for select, search and custom title bar modes.

mod common;

use common::{count, ids, run, settled_stack, Log, TestScreen};
use navshell::{
    BackButton, ModeOutcome, ModeState, Refusal, ScreenId, Title, TitleBarState, TransformMode,
};

/// Entering search animates the title bar and leaves the stack alone
#[test]
fn test_search_mode_on_current_screen() {
    let log = Log::default();
    let mut nav = settled_stack(&["a"], &log);
    let screen = TestScreen::new("b", &log);
    let factors = screen.factors.clone();
    nav.navigate_to(screen.boxed()).unwrap();
    run(&mut nav, 1000);

    assert_eq!(nav.enter_search_mode(), Ok(ModeOutcome::Started));
    run(&mut nav, 400);

    let factors = factors.borrow();
    assert!(!factors.is_empty());
    assert!(factors.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(factors.last(), Some(&1.0));

    let entry = nav.current_entry().unwrap();
    assert!(entry.mode().in_search_mode());
    assert_eq!(entry.chrome().back_button, BackButton::Close);
    let header = nav.scene().settled_header().unwrap();
    assert_eq!(header.back_button, BackButton::Close);
    assert_eq!(header.title, Title::SearchField(String::new()));
    assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
    assert_eq!(count(&log, "b:enter-Some(Search)"), 1);
}

/// A screen is never in two modes, and must leave before entering another
#[test]
fn test_modes_are_exclusive() {
    let log = Log::default();
    let mut nav = settled_stack(&["a"], &log);
    nav.enter_select_mode(2).unwrap();
    assert_eq!(nav.enter_search_mode(), Err(Refusal::ModeConflict));
    assert_eq!(nav.enter_custom_mode(), Err(Refusal::ModeConflict));
    assert_eq!(nav.leave_mode(TransformMode::Search), Err(Refusal::NotInMode));
    run(&mut nav, 400);

    let mode = *nav.current_entry().unwrap().mode();
    assert_eq!(mode, ModeState::Select { count: 2 });
    assert!(!(mode.in_select_mode() && mode.in_search_mode()));

    nav.leave_mode(TransformMode::Select).unwrap();
    // Closing counts as out of the mode, so the next entry queues behind it
    assert_eq!(nav.enter_search_mode(), Ok(ModeOutcome::Deferred));
    run(&mut nav, 800);
    assert_eq!(
        nav.title_bar_state(),
        TitleBarState {
            mode: Some(TransformMode::Search),
            factor: 1.0
        }
    );
    assert_eq!(count(&log, "a:leave-Select"), 1);
}

/// The selection counter follows updates, even mid-transform
#[test]
fn test_selected_count_updates() {
    let log = Log::default();
    let mut nav = settled_stack(&["a"], &log);
    nav.enter_select_mode(1).unwrap();
    run(&mut nav, 64);
    nav.set_selected_count(5).unwrap();
    run(&mut nav, 400);
    assert_eq!(nav.scene().settled_header().unwrap().title, Title::Counter(5));
    assert_eq!(nav.current_entry().unwrap().mode().selected_count(), Some(5));

    nav.set_selected_count(6).unwrap();
    assert_eq!(nav.scene().settled_header().unwrap().title, Title::Counter(6));
}

/// Back closes select mode before anything else sees the press
#[test]
fn test_back_closes_mode_first() {
    let log = Log::default();
    let mut nav = settled_stack(&["a", "b"], &log);
    nav.enter_select_mode(1).unwrap();
    run(&mut nav, 400);

    assert!(nav.on_back_pressed());
    run(&mut nav, 400);
    assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
    assert_eq!(count(&log, "b:back"), 0);
    assert_eq!(nav.title_bar_state().mode, None);

    assert!(nav.on_back_pressed());
    run(&mut nav, 1000);
    assert_eq!(nav.stack_ids(), ids(&["a"]));
}

/// A screen can keep search open on back and still swallow the press
#[test]
fn test_search_can_survive_back() {
    let log = Log::default();
    let mut nav = settled_stack(&["a"], &log);
    let mut screen = TestScreen::new("b", &log);
    screen.close_search_on_back = false;
    nav.navigate_to(screen.boxed()).unwrap();
    run(&mut nav, 1000);
    nav.enter_search_mode().unwrap();
    run(&mut nav, 400);

    assert!(nav.on_back_pressed());
    run(&mut nav, 400);
    assert!(nav.current_entry().unwrap().mode().in_search_mode());
    assert_eq!(nav.stack_ids(), ids(&["a", "b"]));
}

/// A mode transform blocks navigation until it settles
#[test]
fn test_transform_blocks_navigation() {
    let log = Log::default();
    let mut nav = settled_stack(&["a"], &log);
    nav.enter_custom_mode().unwrap();
    let refused = nav
        .navigate_to(TestScreen::new("b", &log).boxed())
        .unwrap_err();
    assert_eq!(refused.reason(), Refusal::CurrentTransforming);
    run(&mut nav, 400);
    assert!(nav.can_navigate());
    assert_eq!(nav.leave_mode(TransformMode::Custom), Ok(ModeOutcome::Started));
}

/// Destroying a screen mid-transform stops its title bar animation
#[test]
fn test_destroy_stops_transform() {
    let log = Log::default();
    let mut nav = settled_stack(&["a", "b"], &log);
    nav.enter_select_mode(1).unwrap();
    run(&mut nav, 32);
    assert!(nav.destroy_screen(&ScreenId::new("b")));
    assert!(nav.can_navigate());
    assert_eq!(nav.enter_search_mode(), Err(Refusal::Destroyed));

    nav.navigate_back().unwrap();
    run(&mut nav, 1000);
    assert_eq!(nav.stack_ids(), ids(&["a"]));
    assert_eq!(nav.title_bar_state().mode, None);
}
