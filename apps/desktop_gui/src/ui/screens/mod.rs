//! Screens are the controllers bound to each view. They draw themselves,
//! queue backend commands, and ask for navigation by pushing a [`NavIntent`];
//! the app applies intents after the screen's borrow has been released.

pub mod about;
pub mod admin;
pub mod feedback;
pub mod login;
pub mod owner;
pub mod registration;
pub mod student;

use crossbeam_channel::Sender;
use eframe::egui;
use navigation::{BackTarget, Controller, NavigationSession, TransitionSpec, ViewDescriptor};
use shared::domain::SessionUser;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{StatusBanner, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub trait Screen: Controller {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>);

    /// Backend completions that are not handled by the app shell itself.
    fn on_event(&mut self, _event: &UiEvent, _ctx: &mut ScreenContext<'_>) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavIntent {
    Open {
        descriptor: ViewDescriptor,
        transition: TransitionSpec,
        back_to: Option<BackTarget>,
    },
    /// Return to a recorded back target, or the user's dashboard.
    Return {
        target: Option<BackTarget>,
        transition: TransitionSpec,
    },
    /// Pop the navigation history, or the user's dashboard when it is empty.
    Back { transition: TransitionSpec },
    Logout,
}

pub struct ScreenContext<'a> {
    pub user: Option<&'a SessionUser>,
    pub session: &'a NavigationSession,
    pub remembered_username: &'a str,
    cmd_tx: &'a Sender<BackendCommand>,
    status: &'a mut Option<StatusBanner>,
    intents: &'a mut Vec<NavIntent>,
}

impl<'a> ScreenContext<'a> {
    pub fn new(
        user: Option<&'a SessionUser>,
        session: &'a NavigationSession,
        remembered_username: &'a str,
        cmd_tx: &'a Sender<BackendCommand>,
        status: &'a mut Option<StatusBanner>,
        intents: &'a mut Vec<NavIntent>,
    ) -> Self {
        Self {
            user,
            session,
            remembered_username,
            cmd_tx,
            status,
            intents,
        }
    }

    pub fn send(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(self.cmd_tx, cmd, self.status)
    }

    pub fn navigate(&mut self, intent: NavIntent) {
        self.intents.push(intent);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        *self.status = Some(StatusBanner::info(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        *self.status = Some(StatusBanner::error(message));
    }
}

/// Rounded card used by the form screens.
pub(crate) fn card(ui: &mut egui::Ui, width: f32, add: impl FnOnce(&mut egui::Ui)) {
    ui.vertical_centered(|ui| {
        ui.set_width(width);
        egui::Frame::NONE
            .fill(ui.visuals().window_fill)
            .corner_radius(14.0)
            .stroke(egui::Stroke::new(
                1.0,
                ui.visuals().widgets.noninteractive.bg_stroke.color,
            ))
            .inner_margin(egui::Margin::symmetric(20, 18))
            .show(ui, |ui| {
                ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                add(ui);
            });
    });
}

pub(crate) fn labeled_field(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    value: &mut String,
    password: bool,
) -> egui::Response {
    ui.label(egui::RichText::new(label).strong());
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .password(password)
            .desired_width(f32::INFINITY),
    )
}

/// Header row shared by the dashboards: title on the left, actions on the right.
pub(crate) fn dashboard_header(
    ui: &mut egui::Ui,
    title: &str,
    user: Option<&SessionUser>,
    actions: impl FnOnce(&mut egui::Ui),
) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(title);
            if let Some(user) = user {
                ui.weak(format!("Welcome, {} ({})", user.display_name, user.role));
            }
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), actions);
    });
    ui.separator();
}
