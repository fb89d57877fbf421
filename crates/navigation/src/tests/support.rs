use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
    BackTarget, Controller, ControllerHandle, NavigationConfig, NavigationSession, Navigator,
    ResourceLoader, SupportsBackTarget, WindowSurface,
};

#[derive(Debug, Default)]
pub struct WindowLog {
    pub titles: Vec<String>,
    pub size: (f32, f32),
    pub closed: bool,
}

pub struct RecordingWindow(Rc<RefCell<WindowLog>>);

impl WindowSurface for RecordingWindow {
    fn set_title(&mut self, title: &str) {
        self.0.borrow_mut().titles.push(title.to_string());
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.0.borrow_mut().size = (width, height);
    }

    fn size(&self) -> (f32, f32) {
        self.0.borrow().size
    }

    fn is_open(&self) -> bool {
        !self.0.borrow().closed
    }
}

pub fn recording_window(width: f32, height: f32) -> (Box<dyn WindowSurface>, Rc<RefCell<WindowLog>>) {
    let log = Rc::new(RefCell::new(WindowLog {
        size: (width, height),
        ..WindowLog::default()
    }));
    (Box::new(RecordingWindow(Rc::clone(&log))), log)
}

#[derive(Debug, Default)]
pub struct BackAwareController {
    pub previous: Option<BackTarget>,
    pub seen_on_activation: Option<BackTarget>,
    pub attached: u32,
}

impl SupportsBackTarget for BackAwareController {
    fn set_previous_page(&mut self, target: BackTarget) {
        self.previous = Some(target);
    }
}

impl Controller for BackAwareController {
    fn as_back_target(&mut self) -> Option<&mut dyn SupportsBackTarget> {
        Some(self)
    }

    fn on_attached(&mut self, _session: &NavigationSession) {
        self.attached += 1;
    }

    fn on_activated(&mut self, session: &NavigationSession) {
        self.seen_on_activation = session.back_target().cloned();
    }
}

#[derive(Debug, Default)]
pub struct PlainController;

impl Controller for PlainController {}

pub fn handle<T: Controller>(controller: T) -> ControllerHandle<dyn Controller> {
    let shared: Rc<RefCell<dyn Controller>> = Rc::new(RefCell::new(controller));
    ControllerHandle::new(shared)
}

pub fn loader() -> ResourceLoader<dyn Controller> {
    let mut loader = ResourceLoader::new();
    loader
        .register("login", || handle(PlainController))
        .register("dashboard", || handle(BackAwareController::default()))
        .register("feedback", || handle(BackAwareController::default()))
        .register_stylesheet("dashboard.css", "accent = \"#2563eb\"");
    loader
}

pub fn navigator(width: f32, height: f32) -> (Navigator<dyn Controller>, Rc<RefCell<WindowLog>>) {
    let mut navigator = Navigator::new(loader(), NavigationConfig::default());
    let (window, log) = recording_window(width, height);
    navigator.set_primary_window(window);
    (navigator, log)
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
