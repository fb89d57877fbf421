//! The catalogue of views the client can navigate to, with the window
//! geometry and stylesheet that go with each.

use std::{cell::RefCell, rc::Rc};

use navigation::{BackTarget, ControllerHandle, ResourceLoader, ViewDescriptor};
use shared::domain::Role;

use crate::ui::screens::{
    about::AboutScreen, admin::AdminDashboard, feedback::FeedbackScreen, login::LoginScreen,
    owner::OwnerDashboard, registration::RegistrationScreen, student::StudentDashboard, Screen,
};

pub const LOGIN: &str = "login";
pub const REGISTRATION: &str = "registration";
pub const STUDENT_DASHBOARD: &str = "student-dashboard";
pub const OWNER_DASHBOARD: &str = "houseowner-dashboard";
pub const ADMIN_DASHBOARD: &str = "admin-dashboard";
pub const FEEDBACK: &str = "feedback";
pub const ABOUT: &str = "about-us";

pub fn login() -> ViewDescriptor {
    ViewDescriptor::new(LOGIN, 1000.0, 620.0, "StudentNest - Login").with_stylesheet("login.toml")
}

pub fn registration() -> ViewDescriptor {
    ViewDescriptor::new(REGISTRATION, 1000.0, 647.0, "StudentNest - Create Account")
        .with_stylesheet("registration.toml")
}

pub fn dashboard_for(role: Role) -> ViewDescriptor {
    match role {
        Role::Student => ViewDescriptor::new(
            STUDENT_DASHBOARD,
            1400.0,
            850.0,
            "StudentNest - Student Dashboard",
        )
        .with_stylesheet("student-dashboard.toml"),
        Role::HouseOwner => ViewDescriptor::new(
            OWNER_DASHBOARD,
            1400.0,
            850.0,
            "StudentNest - House Owner Dashboard",
        )
        .with_stylesheet("modern-dashboard.toml"),
        Role::Admin => ViewDescriptor::new(
            ADMIN_DASHBOARD,
            1400.0,
            850.0,
            "StudentNest - Admin Dashboard",
        )
        .with_stylesheet("admin-dashboard.toml"),
    }
}

pub fn feedback() -> ViewDescriptor {
    ViewDescriptor::new(FEEDBACK, 800.0, 600.0, "StudentNest - Feedback").with_stylesheet("feedback.toml")
}

pub fn about() -> ViewDescriptor {
    ViewDescriptor::new(ABOUT, 800.0, 600.0, "StudentNest - About Us").with_stylesheet("about.toml")
}

/// Rebuild the full descriptor for a back target. The target's stylesheet
/// replaces the catalogue default.
pub fn resolve(target: &BackTarget) -> Option<ViewDescriptor> {
    let base = match target.view_id.as_str() {
        LOGIN => login(),
        REGISTRATION => registration(),
        STUDENT_DASHBOARD => dashboard_for(Role::Student),
        OWNER_DASHBOARD => dashboard_for(Role::HouseOwner),
        ADMIN_DASHBOARD => dashboard_for(Role::Admin),
        FEEDBACK => feedback(),
        ABOUT => about(),
        _ => return None,
    };
    Some(match &target.stylesheet_id {
        Some(stylesheet) => ViewDescriptor::new(
            base.view_id().clone(),
            base.width(),
            base.height(),
            base.title(),
        )
        .with_stylesheet(stylesheet.clone()),
        None => base,
    })
}

fn screen<S: Screen + 'static>(screen: S) -> ControllerHandle<dyn Screen> {
    let shared: Rc<RefCell<dyn Screen>> = Rc::new(RefCell::new(screen));
    ControllerHandle::new(shared)
}

pub fn register_screens(loader: &mut ResourceLoader<dyn Screen>) {
    loader
        .register(LOGIN, || screen(LoginScreen::default()))
        .register(REGISTRATION, || screen(RegistrationScreen::default()))
        .register(STUDENT_DASHBOARD, || screen(StudentDashboard::default()))
        .register(OWNER_DASHBOARD, || screen(OwnerDashboard::default()))
        .register(ADMIN_DASHBOARD, || screen(AdminDashboard::default()))
        .register(FEEDBACK, || screen(FeedbackScreen::default()))
        .register(ABOUT, || screen(AboutScreen::default()));
}
