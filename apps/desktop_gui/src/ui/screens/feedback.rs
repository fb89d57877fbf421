use eframe::egui;
use navigation::{
    BackTarget, Controller, NavigationSession, SupportsBackTarget, TransitionKind, TransitionSpec,
};

use super::{card, NavIntent, Screen, ScreenContext};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

#[derive(Debug, Default)]
pub struct FeedbackScreen {
    text: String,
    previous: Option<BackTarget>,
    submitting: bool,
}

impl FeedbackScreen {
    pub fn previous(&self) -> Option<&BackTarget> {
        self.previous.as_ref()
    }

    fn submit(&mut self, ctx: &mut ScreenContext<'_>) {
        if self.submitting {
            return;
        }
        let text = self.text.trim();
        if text.is_empty() {
            ctx.error("Please enter your feedback before submitting.");
            return;
        }
        let Some(user) = ctx.user.map(|user| user.user_id) else {
            ctx.error("Please log in again to send feedback.");
            return;
        };
        self.submitting = ctx.send(BackendCommand::SubmitFeedback {
            user,
            text: text.to_string(),
        });
    }

    fn go_back(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Return {
            target: self.previous.clone(),
            transition: TransitionSpec::of(TransitionKind::SlideRight),
        });
    }
}

impl SupportsBackTarget for FeedbackScreen {
    fn set_previous_page(&mut self, target: BackTarget) {
        self.previous = Some(target);
    }
}

impl Controller for FeedbackScreen {
    fn as_back_target(&mut self) -> Option<&mut dyn SupportsBackTarget> {
        Some(self)
    }

    fn on_activated(&mut self, session: &NavigationSession) {
        if self.previous.is_none() {
            self.previous = session.back_target().cloned();
        }
    }
}

impl Screen for FeedbackScreen {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        ui.add_space(20.0);
        let width = ui.available_width().clamp(420.0, 640.0);
        card(ui, width, |ui| {
            ui.heading("Feedback & Issues");
            ui.weak("Tell us what works, what does not, or report a problem with a listing.");
            ui.add(
                egui::TextEdit::multiline(&mut self.text)
                    .hint_text("Write your feedback here...")
                    .desired_rows(10)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.submitting, egui::Button::new("Submit"))
                    .clicked()
                {
                    self.submit(ctx);
                }
                if ui.button("Back").clicked() {
                    self.go_back(ctx);
                }
                if self.submitting {
                    ui.spinner();
                }
            });
        });
    }

    fn on_event(&mut self, event: &UiEvent, ctx: &mut ScreenContext<'_>) {
        match event {
            UiEvent::FeedbackSubmitted => {
                self.submitting = false;
                self.text.clear();
                ctx.info("Your feedback has been submitted successfully!");
                self.go_back(ctx);
            }
            UiEvent::Error(_) => self.submitting = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::screens::test_support::Harness;
    use shared::domain::{Role, SessionUser, UserId};

    fn student() -> SessionUser {
        SessionUser {
            user_id: UserId(8),
            username: "sadia".into(),
            display_name: "Sadia".into(),
            role: Role::Student,
        }
    }

    #[test]
    fn explicit_back_target_wins_over_session() {
        let mut session = NavigationSession::new(4);
        session.set_back_target("admin-dashboard", None);

        let mut screen = FeedbackScreen::default();
        screen.set_previous_page(BackTarget::new("student-dashboard", None));
        screen.on_activated(&session);
        assert_eq!(
            screen.previous().map(|target| target.view_id.as_str()),
            Some("student-dashboard")
        );

        let mut fresh = FeedbackScreen::default();
        fresh.on_activated(&session);
        assert_eq!(
            fresh.previous().map(|target| target.view_id.as_str()),
            Some("admin-dashboard")
        );
    }

    #[test]
    fn submission_returns_to_the_previous_page() {
        let mut harness = Harness::new(Some(student()));
        let mut screen = FeedbackScreen::default();
        screen.set_previous_page(BackTarget::new("student-dashboard", Some("student-dashboard.toml".into())));
        screen.text = "  The filters are handy  ".into();

        harness.with(|ctx| screen.submit(ctx));
        match harness.commands().as_slice() {
            [BackendCommand::SubmitFeedback { user, text }] => {
                assert_eq!(*user, UserId(8));
                assert_eq!(text, "The filters are handy");
            }
            other => panic!("unexpected commands: {other:?}"),
        }

        harness.with(|ctx| screen.on_event(&UiEvent::FeedbackSubmitted, ctx));
        match harness.intents.as_slice() {
            [NavIntent::Return {
                target: Some(target),
                transition,
            }] => {
                assert_eq!(target.view_id.as_str(), "student-dashboard");
                assert_eq!(transition.kind, TransitionKind::SlideRight);
            }
            other => panic!("unexpected intents: {other:?}"),
        }
        assert!(screen.text.is_empty());
    }

    #[test]
    fn blank_feedback_is_not_sent() {
        let mut harness = Harness::new(Some(student()));
        let mut screen = FeedbackScreen::default();
        screen.text = "\n  ".into();
        harness.with(|ctx| screen.submit(ctx));
        assert!(harness.commands().is_empty());
        assert!(harness.status.is_some());
    }
}
