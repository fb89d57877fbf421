use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use navigation::{
    BackTarget, Controller, ControllerHandle, NavigationConfig, NavigationError,
    NavigationRequest, NavigationSession, Navigator, ResourceLoader, SupportsBackTarget,
    TransitionEvent, TransitionKind, TransitionSpec, ViewDescriptor, WindowSurface,
};

#[derive(Default)]
struct Surface {
    size: (f32, f32),
}

impl WindowSurface for Surface {
    fn set_title(&mut self, _title: &str) {}

    fn set_size(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }

    fn size(&self) -> (f32, f32) {
        self.size
    }
}

#[derive(Default)]
struct Dashboard;

impl Controller for Dashboard {}

#[derive(Default)]
struct Feedback {
    return_to: Option<BackTarget>,
}

impl SupportsBackTarget for Feedback {
    fn set_previous_page(&mut self, target: BackTarget) {
        self.return_to = Some(target);
    }
}

impl Controller for Feedback {
    fn as_back_target(&mut self) -> Option<&mut dyn SupportsBackTarget> {
        Some(self)
    }

    fn on_activated(&mut self, session: &NavigationSession) {
        if self.return_to.is_none() {
            self.return_to = session.back_target().cloned();
        }
    }
}

fn boxed<T: Controller>(controller: T) -> ControllerHandle<dyn Controller> {
    let shared: Rc<RefCell<dyn Controller>> = Rc::new(RefCell::new(controller));
    ControllerHandle::new(shared)
}

fn build() -> Navigator<dyn Controller> {
    let mut loader = ResourceLoader::new();
    loader
        .register("student-dashboard", || boxed(Dashboard))
        .register("feedback", || boxed(Feedback::default()))
        .register_stylesheet("student.toml", "accent = \"#0f766e\"");
    let mut navigator = Navigator::new(loader, NavigationConfig::default());
    navigator.set_primary_window(Box::new(Surface {
        size: (1000.0, 620.0),
    }));
    navigator
}

fn run_until_idle(navigator: &mut Navigator<dyn Controller>, mut now: Instant) -> (Instant, Vec<TransitionEvent>) {
    let mut events = Vec::new();
    while navigator.is_busy() || navigator.has_deferred() {
        now += Duration::from_millis(16);
        events.extend(navigator.tick(now));
    }
    (now, events)
}

#[test]
fn feedback_round_trip_returns_to_the_dashboard_it_came_from() {
    let mut navigator = build();
    let student = ViewDescriptor::new("student-dashboard", 1400.0, 850.0, "StudentNest - Student")
        .with_stylesheet("student.toml");
    let t0 = Instant::now();

    navigator
        .navigate(
            NavigationRequest::to(student.clone()).transition(TransitionSpec::none()),
            t0,
        )
        .expect("dashboard");

    let feedback = navigator
        .navigate(
            NavigationRequest::to(ViewDescriptor::new("feedback", 800.0, 600.0, "Feedback"))
                .transition(TransitionSpec::of(TransitionKind::SlideLeft)),
            t0,
        )
        .expect("feedback");
    navigator.set_back_target(student.view_id().clone(), student.stylesheet_id().cloned());
    let (now, events) = run_until_idle(&mut navigator, t0);
    assert!(events.contains(&TransitionEvent::Completed {
        view_id: "feedback".into()
    }));

    let target = feedback
        .with(|feedback: &mut Feedback| feedback.return_to.clone())
        .expect("feedback controller")
        .expect("back target");
    assert_eq!(target, student.back_target());

    let returned = navigator
        .back(TransitionSpec::of(TransitionKind::SlideRight), now)
        .expect("back")
        .expect("history");
    assert!(returned.is::<Dashboard>());
    let (_, events) = run_until_idle(&mut navigator, now);
    assert!(events.contains(&TransitionEvent::Completed {
        view_id: "student-dashboard".into()
    }));
    assert_eq!(navigator.window().size(), (1400.0, 850.0));
    assert_eq!(navigator.window().stylesheets().len(), 1);
}

#[test]
fn rapid_double_navigation_degrades_to_busy_then_deferred() {
    let mut navigator = build();
    let t0 = Instant::now();
    let dashboard = ViewDescriptor::new("student-dashboard", 1400.0, 850.0, "Student");
    let feedback = ViewDescriptor::new("feedback", 800.0, 600.0, "Feedback");

    navigator
        .navigate(NavigationRequest::to(dashboard), t0)
        .expect("first");
    let err = navigator
        .navigate(NavigationRequest::to(feedback.clone()), t0)
        .expect_err("second is busy");
    assert!(matches!(err, NavigationError::Busy));

    navigator.defer(NavigationRequest::to(feedback));
    let (_, events) = run_until_idle(&mut navigator, t0);

    let completed: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            TransitionEvent::Completed { view_id } => Some(view_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec!["student-dashboard", "feedback"]);
    assert_eq!(navigator.window().title(), "Feedback");
}
