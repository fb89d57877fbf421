use super::*;
use crate::{
    test_support::{handle, ms, recording_window, PlainController},
    Controller, ViewId,
};

fn scene(view: &str, width: f32, height: f32) -> SceneChange<dyn Controller> {
    SceneChange {
        root: ViewRoot::new(ViewId::from(view), handle(PlainController)),
        stylesheets: Vec::new(),
        width,
        height,
        title: view.to_string(),
    }
}

fn window_showing(view: &str) -> (WindowController<dyn Controller>, std::rc::Rc<std::cell::RefCell<crate::test_support::WindowLog>>) {
    let mut window = WindowController::new();
    let (surface, log) = recording_window(1000.0, 620.0);
    window.set_primary_window(surface);
    let change = scene(view, 1000.0, 620.0);
    window
        .apply_view(change.root, Vec::new(), 1000.0, 620.0, view)
        .expect("initial view");
    (window, log)
}

fn shown(window: &WindowController<dyn Controller>) -> (String, Presentation) {
    let root = window.content().expect("content");
    (root.view_id().to_string(), root.presentation())
}

#[test]
fn immediate_transition_swaps_before_returning() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    let events = engine
        .begin(scene("dashboard", 1400.0, 850.0), TransitionSpec::none(), &mut window, t0)
        .expect("begin");

    assert!(engine.is_idle());
    assert_eq!(
        events,
        vec![
            TransitionEvent::Swapped { view_id: ViewId::from("dashboard") },
            TransitionEvent::Completed { view_id: ViewId::from("dashboard") },
        ]
    );
    assert_eq!(shown(&window), ("dashboard".to_string(), Presentation::RESTING));
    assert_eq!(window.size(), (1400.0, 850.0));
}

#[test]
fn fade_reaches_zero_before_swap_and_rises_after() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    let events = engine
        .begin(scene("dashboard", 1400.0, 850.0), TransitionSpec::default(), &mut window, t0)
        .expect("begin");
    assert!(events.is_empty());
    assert_eq!(engine.phase(), TransitionPhase::Outgoing);

    let mut last_opacity = 1.0;
    for step in [60, 120, 180, 240] {
        assert!(engine.tick(&mut window, t0 + ms(step)).is_empty());
        let (view, presentation) = shown(&window);
        assert_eq!(view, "login");
        assert!(presentation.opacity < last_opacity);
        last_opacity = presentation.opacity;
    }

    let events = engine.tick(&mut window, t0 + ms(300));
    assert_eq!(events, vec![TransitionEvent::Swapped { view_id: ViewId::from("dashboard") }]);
    let (view, presentation) = shown(&window);
    assert_eq!(view, "dashboard");
    assert_eq!(presentation.opacity, 0.0);
    assert_eq!(engine.phase(), TransitionPhase::Incoming);

    let mut last_opacity = 0.0;
    for step in [360, 420, 480, 540] {
        assert!(engine.tick(&mut window, t0 + ms(step)).is_empty());
        let (_, presentation) = shown(&window);
        assert!(presentation.opacity > last_opacity);
        last_opacity = presentation.opacity;
    }

    let events = engine.tick(&mut window, t0 + ms(600));
    assert_eq!(events, vec![TransitionEvent::Completed { view_id: ViewId::from("dashboard") }]);
    assert_eq!(shown(&window).1, Presentation::RESTING);
    assert!(engine.is_idle());
}

#[test]
fn slide_left_moves_out_by_full_width_and_in_from_the_right() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    engine
        .begin(
            scene("registration", 1000.0, 647.0),
            TransitionSpec::of(TransitionKind::SlideLeft),
            &mut window,
            t0,
        )
        .expect("begin");

    engine.tick(&mut window, t0 + ms(200));
    let (view, presentation) = shown(&window);
    assert_eq!(view, "login");
    assert_eq!(presentation.offset, (-500.0, 0.0));

    let events = engine.tick(&mut window, t0 + ms(400));
    assert_eq!(events, vec![TransitionEvent::Swapped { view_id: ViewId::from("registration") }]);
    let (view, presentation) = shown(&window);
    assert_eq!(view, "registration");
    assert_eq!(presentation.offset, (1000.0, 0.0));
    assert_eq!(presentation.opacity, 1.0);

    engine.tick(&mut window, t0 + ms(600));
    assert_eq!(shown(&window).1.offset, (500.0, 0.0));

    let events = engine.tick(&mut window, t0 + ms(800));
    assert_eq!(events, vec![TransitionEvent::Completed { view_id: ViewId::from("registration") }]);
    assert_eq!(shown(&window).1.offset, (0.0, 0.0));
}

#[test]
fn slide_down_uses_window_height_at_start() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    engine
        .begin(
            scene("about", 1400.0, 800.0),
            TransitionSpec::of(TransitionKind::SlideDown),
            &mut window,
            t0,
        )
        .expect("begin");

    engine.tick(&mut window, t0 + ms(400));
    assert_eq!(shown(&window).1.offset, (0.0, -620.0));
}

#[test]
fn first_view_skips_the_outgoing_phase() {
    let mut window: WindowController<dyn Controller> = WindowController::new();
    let (surface, _log) = recording_window(800.0, 600.0);
    window.set_primary_window(surface);
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    let events = engine
        .begin(scene("login", 1000.0, 620.0), TransitionSpec::default(), &mut window, t0)
        .expect("begin");

    assert_eq!(events, vec![TransitionEvent::Swapped { view_id: ViewId::from("login") }]);
    assert_eq!(engine.phase(), TransitionPhase::Incoming);
    assert_eq!(shown(&window).1.opacity, 0.0);
}

#[test]
fn second_begin_while_in_flight_is_busy() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    engine
        .begin(scene("dashboard", 1400.0, 850.0), TransitionSpec::default(), &mut window, t0)
        .expect("begin");
    let err = engine
        .begin(scene("feedback", 800.0, 600.0), TransitionSpec::none(), &mut window, t0)
        .expect_err("busy");
    assert!(matches!(err, NavigationError::Busy));
    assert_eq!(shown(&window).0, "login");
}

#[test]
fn closing_the_window_aborts_and_keeps_the_last_completed_root() {
    let (mut window, log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    engine
        .begin(scene("dashboard", 1400.0, 850.0), TransitionSpec::default(), &mut window, t0)
        .expect("begin");
    engine.tick(&mut window, t0 + ms(100));

    log.borrow_mut().closed = true;
    let events = engine.tick(&mut window, t0 + ms(200));

    assert_eq!(
        events,
        vec![TransitionEvent::Aborted {
            view_id: ViewId::from("dashboard"),
            reason: "window closed".to_string(),
        }]
    );
    assert!(engine.is_idle());
    assert_eq!(shown(&window), ("login".to_string(), Presentation::RESTING));
    assert!(window.content().is_some_and(ViewRoot::is_interactive));
}

#[test]
fn stalled_transition_is_forced_to_completion() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::new(ms(500));
    let t0 = Instant::now();

    engine
        .begin(scene("dashboard", 1400.0, 850.0), TransitionSpec::default(), &mut window, t0)
        .expect("begin");

    let events = engine.tick(&mut window, t0 + ms(5_000));
    assert_eq!(
        events,
        vec![
            TransitionEvent::Swapped { view_id: ViewId::from("dashboard") },
            TransitionEvent::Completed { view_id: ViewId::from("dashboard") },
        ]
    );
    assert!(engine.is_idle());
    assert_eq!(shown(&window), ("dashboard".to_string(), Presentation::RESTING));
}

#[test]
fn long_fade_keeps_animating_past_the_slack() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();
    let spec = TransitionSpec::of(TransitionKind::Fade).with_duration(ms(1_500));

    engine
        .begin(scene("dashboard", 1400.0, 850.0), spec, &mut window, t0)
        .expect("begin");

    let events = engine.tick(&mut window, t0 + ms(1_500));
    assert_eq!(events, vec![TransitionEvent::Swapped { view_id: ViewId::from("dashboard") }]);
    assert_eq!(shown(&window).1.opacity, 0.0);

    let events = engine.tick(&mut window, t0 + ms(2_100));
    assert!(events.is_empty());
    assert!(!engine.is_idle());
    let (view, frame) = shown(&window);
    assert_eq!(view, "dashboard");
    assert!((frame.opacity - 0.4).abs() < 1e-3);

    let events = engine.tick(&mut window, t0 + ms(3_000));
    assert_eq!(events, vec![TransitionEvent::Completed { view_id: ViewId::from("dashboard") }]);
}

#[test]
fn finish_now_completes_mid_incoming() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();

    engine
        .begin(scene("dashboard", 1400.0, 850.0), TransitionSpec::default(), &mut window, t0)
        .expect("begin");
    engine.tick(&mut window, t0 + ms(300));
    engine.tick(&mut window, t0 + ms(350));

    let events = engine.finish_now(&mut window, t0 + ms(360));
    assert_eq!(events, vec![TransitionEvent::Completed { view_id: ViewId::from("dashboard") }]);
    assert_eq!(shown(&window).1, Presentation::RESTING);
}

#[test]
fn roots_ignore_input_until_the_transition_completes() {
    let (mut window, _log) = window_showing("login");
    let mut engine = TransitionEngine::default();
    let t0 = Instant::now();
    assert!(window.content().is_some_and(ViewRoot::is_interactive));

    engine
        .begin(scene("feedback", 800.0, 600.0), TransitionSpec::of(TransitionKind::SlideLeft), &mut window, t0)
        .expect("begin");
    assert!(!window.content().is_some_and(ViewRoot::is_interactive));

    engine.tick(&mut window, t0 + ms(400));
    assert_eq!(shown(&window).0, "feedback");
    assert!(!window.content().is_some_and(ViewRoot::is_interactive));

    let events = engine.tick(&mut window, t0 + ms(800));
    assert_eq!(events, vec![TransitionEvent::Completed { view_id: ViewId::from("feedback") }]);
    assert!(window.content().is_some_and(ViewRoot::is_interactive));
}
