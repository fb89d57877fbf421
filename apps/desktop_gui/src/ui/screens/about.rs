use eframe::egui;
use navigation::{Controller, TransitionKind, TransitionSpec};

use super::{NavIntent, Screen, ScreenContext};

const FEATURES: [&str; 4] = [
    "Browse rooms by location and monthly rent",
    "See owner contact details and map links",
    "House owners list, update and retire their rooms",
    "Send feedback or report issues to the admins",
];

#[derive(Debug, Default)]
pub struct AboutScreen;

impl AboutScreen {
    fn go_back(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Back {
            transition: TransitionSpec::of(TransitionKind::SlideDown),
        });
    }
}

impl Controller for AboutScreen {}

impl Screen for AboutScreen {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            ui.heading("About StudentNest");
            ui.label("StudentNest connects students looking for accommodation with house owners near campus.");
        });
        ui.add_space(12.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(egui::RichText::new("What you can do").strong());
            for feature in FEATURES {
                ui.label(format!("• {feature}"));
            }
        });
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            if ui.button("Back").clicked() {
                self.go_back(ctx);
            }
        });
    }
}
