use eframe::egui;
use navigation::{Controller, TransitionKind, TransitionSpec};
use shared::domain::Role;

use super::{card, labeled_field, NavIntent, Screen, ScreenContext};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::views;

/// Roles that can sign themselves up. Admin accounts are created with the
/// tools CLI.
const SELF_SERVICE_ROLES: [Role; 2] = [Role::Student, Role::HouseOwner];

#[derive(Debug)]
pub struct RegistrationScreen {
    display_name: String,
    username: String,
    password: String,
    confirm: String,
    role: Role,
    pending: bool,
}

impl Default for RegistrationScreen {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            username: String::new(),
            password: String::new(),
            confirm: String::new(),
            role: Role::Student,
            pending: false,
        }
    }
}

impl RegistrationScreen {
    fn validate(&self) -> Result<(), &'static str> {
        if self.display_name.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
        {
            return Err("Please fill all fields.");
        }
        if self.username.trim().contains(char::is_whitespace) {
            return Err("Username must not contain spaces.");
        }
        if self.password != self.confirm {
            return Err("Passwords do not match.");
        }
        Ok(())
    }

    fn submit(&mut self, ctx: &mut ScreenContext<'_>) {
        if self.pending {
            return;
        }
        if let Err(message) = self.validate() {
            ctx.error(message);
            return;
        }
        self.pending = ctx.send(BackendCommand::Register {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            display_name: self.display_name.trim().to_string(),
            role: self.role,
        });
    }

    fn back_to_login(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Open {
            descriptor: views::login(),
            transition: TransitionSpec::of(TransitionKind::SlideRight),
            back_to: None,
        });
    }
}

impl Controller for RegistrationScreen {}

impl Screen for RegistrationScreen {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        ui.add_space(24.0);
        let width = ui.available_width().clamp(400.0, 500.0);
        card(ui, width, |ui| {
            ui.heading("Create your account");
            ui.add_space(4.0);

            labeled_field(ui, "Full name", "Your name", &mut self.display_name, false);
            labeled_field(ui, "Username", "username", &mut self.username, false);
            labeled_field(ui, "Password", "password", &mut self.password, true);
            labeled_field(ui, "Confirm password", "password", &mut self.confirm, true);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("I am a").strong());
                for role in SELF_SERVICE_ROLES {
                    ui.radio_value(&mut self.role, role, role.label());
                }
            });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.pending, egui::Button::new("Register"))
                    .clicked()
                {
                    self.submit(ctx);
                }
                if ui.button("Back to login").clicked() {
                    self.back_to_login(ctx);
                }
                if self.pending {
                    ui.spinner();
                }
            });
        });
    }

    fn on_event(&mut self, event: &UiEvent, _ctx: &mut ScreenContext<'_>) {
        if matches!(event, UiEvent::Registered { .. } | UiEvent::Error(_)) {
            self.pending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::screens::test_support::Harness;

    fn filled() -> RegistrationScreen {
        RegistrationScreen {
            display_name: "Tania Akter".into(),
            username: "tania".into(),
            password: "pw123".into(),
            confirm: "pw123".into(),
            role: Role::HouseOwner,
            pending: false,
        }
    }

    #[test]
    fn mismatched_passwords_are_rejected_locally() {
        let mut harness = Harness::new(None);
        let mut screen = filled();
        screen.confirm = "pw124".into();

        harness.with(|ctx| screen.submit(ctx));

        assert!(harness.commands().is_empty());
        assert_eq!(
            harness.status.map(|banner| banner.message),
            Some("Passwords do not match.".to_string())
        );
    }

    #[test]
    fn valid_form_queues_registration() {
        let mut harness = Harness::new(None);
        let mut screen = filled();

        harness.with(|ctx| screen.submit(ctx));

        match harness.commands().as_slice() {
            [BackendCommand::Register {
                username,
                display_name,
                role,
                ..
            }] => {
                assert_eq!(username, "tania");
                assert_eq!(display_name, "Tania Akter");
                assert_eq!(*role, Role::HouseOwner);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
        assert!(screen.pending);
    }

    #[test]
    fn back_slides_right_to_login() {
        let mut harness = Harness::new(None);
        let mut screen = filled();
        harness.with(|ctx| screen.back_to_login(ctx));
        assert!(matches!(
            harness.intents.as_slice(),
            [NavIntent::Open { transition, .. }] if transition.kind == TransitionKind::SlideRight
        ));
    }
}
