use super::*;
use crate::{
    descriptor::ViewDescriptor,
    test_support::{handle, PlainController},
    Controller,
};

#[test]
fn back_target_round_trips() {
    let mut session = NavigationSession::default();
    session.set_back_target("student-dashboard", Some(StylesheetId::from("student.toml")));

    let target = session.back_target().expect("back target");
    assert_eq!(target.view_id.as_str(), "student-dashboard");
    assert_eq!(
        target.stylesheet_id.as_ref().map(StylesheetId::as_str),
        Some("student.toml")
    );
}

#[test]
fn history_drops_oldest_entries_past_limit() {
    let mut session = NavigationSession::new(2);
    for view in ["login", "dashboard", "feedback"] {
        session.push_history(ViewDescriptor::new(view, 800.0, 600.0, view));
    }

    assert_eq!(session.history_len(), 2);
    assert_eq!(session.pop_history().expect("entry").view_id().as_str(), "feedback");
    assert_eq!(session.pop_history().expect("entry").view_id().as_str(), "dashboard");
    assert!(session.pop_history().is_none());
}

#[test]
fn zero_history_limit_keeps_nothing() {
    let mut session = NavigationSession::new(0);
    session.push_history(ViewDescriptor::new("login", 800.0, 600.0, "Login"));
    assert_eq!(session.history_len(), 0);
}

#[test]
fn active_controller_is_only_a_weak_reference() {
    let mut session = NavigationSession::default();
    let controller = handle(PlainController);
    session.record_active(ViewId::from("login"), &controller);

    let (view_id, active) = session
        .active::<dyn Controller>()
        .expect("active controller");
    assert_eq!(view_id.as_str(), "login");
    assert!(active.ptr_eq(&controller));
    drop(active);

    drop(controller);
    assert!(session.active::<dyn Controller>().is_none());
    assert_eq!(session.active_view_id().map(ViewId::as_str), Some("login"));
}

#[test]
fn clear_forgets_back_target_and_history() {
    let mut session = NavigationSession::default();
    session.set_back_target("admin-dashboard", None);
    session.push_history(ViewDescriptor::new("login", 800.0, 600.0, "Login"));

    session.clear();

    assert!(session.back_target().is_none());
    assert_eq!(session.history_len(), 0);
}
