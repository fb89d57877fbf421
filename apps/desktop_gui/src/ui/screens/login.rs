use eframe::egui;
use navigation::{Controller, TransitionKind, TransitionSpec};
use shared::domain::Role;

use super::{card, labeled_field, NavIntent, Screen, ScreenContext};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::views;

#[derive(Debug)]
pub struct LoginScreen {
    username: String,
    password: String,
    role: Role,
    pending: bool,
    prefilled: bool,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: Role::Student,
            pending: false,
            prefilled: false,
        }
    }
}

impl LoginScreen {
    pub fn prefill(&mut self, username: &str) {
        self.username = username.to_string();
        self.password.clear();
        self.prefilled = true;
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn submit(&mut self, ctx: &mut ScreenContext<'_>) {
        if self.pending {
            return;
        }
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            ctx.error("Please enter both username and password.");
            return;
        }
        self.pending = ctx.send(BackendCommand::Authenticate {
            username: username.to_string(),
            password: self.password.clone(),
            role: self.role,
        });
    }

    fn create_account(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Open {
            descriptor: views::registration(),
            transition: TransitionSpec::of(TransitionKind::SlideLeft),
            back_to: None,
        });
    }
}

impl Controller for LoginScreen {}

impl Screen for LoginScreen {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        if !self.prefilled {
            self.prefilled = true;
            if self.username.is_empty() {
                self.username = ctx.remembered_username.to_string();
            }
        }

        let top_space = (ui.available_height() * 0.12).clamp(18.0, 90.0);
        ui.add_space(top_space);
        let width = ui.available_width().clamp(380.0, 460.0);
        card(ui, width, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("StudentNest");
                ui.weak("Find a room near campus.");
            });
            ui.add_space(8.0);

            labeled_field(ui, "Username", "username", &mut self.username, false);
            let password = labeled_field(ui, "Password", "password", &mut self.password, true);

            ui.label(egui::RichText::new("Sign in as").strong());
            egui::ComboBox::from_id_salt("login_role")
                .selected_text(self.role.label())
                .show_ui(ui, |ui| {
                    for role in Role::ALL {
                        ui.selectable_value(&mut self.role, role, role.label());
                    }
                });

            ui.add_space(6.0);
            let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let label = if self.pending { "Signing in..." } else { "Login" };
            let login = ui.add_enabled(
                !self.pending,
                egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0)),
            );
            if login.clicked() || enter {
                self.submit(ctx);
            }

            ui.horizontal(|ui| {
                ui.weak("New here?");
                if ui.link("Create an account").clicked() {
                    self.create_account(ctx);
                }
            });
        });
    }

    fn on_event(&mut self, event: &UiEvent, ctx: &mut ScreenContext<'_>) {
        match event {
            UiEvent::LoginRejected => {
                self.pending = false;
                self.password.clear();
                ctx.error("Invalid credentials or user type.");
            }
            UiEvent::Authenticated(_) | UiEvent::Error(_) => self.pending = false,
            _ => {}
        }
    }
}
