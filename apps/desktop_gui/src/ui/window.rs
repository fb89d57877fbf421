use std::{cell::Cell, rc::Rc};

use eframe::egui;
use navigation::WindowSurface;

/// The eframe root viewport seen through the navigation core. Title and
/// size changes become viewport commands for the next frame.
pub struct EguiWindow {
    ctx: egui::Context,
    requested: (f32, f32),
    open: Rc<Cell<bool>>,
}

impl EguiWindow {
    /// Returns the surface and the flag the app clears when the user closes
    /// the window.
    pub fn new(ctx: egui::Context, initial_size: (f32, f32)) -> (Self, Rc<Cell<bool>>) {
        let open = Rc::new(Cell::new(true));
        let window = Self {
            ctx,
            requested: initial_size,
            open: Rc::clone(&open),
        };
        (window, open)
    }

    /// Inner size the platform last reported, which tracks user resizes.
    fn live_size(&self) -> Option<(f32, f32)> {
        self.ctx
            .input(|i| i.viewport().inner_rect)
            .map(|rect| (rect.width(), rect.height()))
    }
}

impl WindowSurface for EguiWindow {
    fn set_title(&mut self, title: &str) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Title(title.to_owned()));
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.requested = (width, height);
        if let Some((live_w, live_h)) = self.live_size() {
            if (live_w - width).abs() < 0.5 && (live_h - height).abs() < 0.5 {
                return;
            }
        }
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(width, height)));
    }

    fn size(&self) -> (f32, f32) {
        self.live_size().unwrap_or(self.requested)
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_at(width: f32, height: f32) -> egui::RawInput {
        let mut raw = egui::RawInput::default();
        raw.viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .inner_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(width, height),
        ));
        raw
    }

    fn resize_commands(output: &egui::FullOutput) -> Vec<egui::Vec2> {
        output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|viewport| {
                viewport
                    .commands
                    .iter()
                    .filter_map(|cmd| match cmd {
                        egui::ViewportCommand::InnerSize(size) => Some(*size),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn user_resize_is_undone_when_returning_to_the_same_view_size() {
        let ctx = egui::Context::default();
        let (mut window, _open) = EguiWindow::new(ctx.clone(), (1000.0, 620.0));

        // The user dragged the window larger; the next view wants 1000x620 again.
        let output = ctx.run(input_at(1280.0, 800.0), |_| window.set_size(1000.0, 620.0));

        assert_eq!(resize_commands(&output), vec![egui::vec2(1000.0, 620.0)]);
    }

    #[test]
    fn matching_live_size_sends_no_resize() {
        let ctx = egui::Context::default();
        let (mut window, _open) = EguiWindow::new(ctx.clone(), (800.0, 600.0));

        let output = ctx.run(input_at(1000.0, 620.0), |_| window.set_size(1000.0, 620.0));

        assert!(resize_commands(&output).is_empty());
    }

    #[test]
    fn size_reports_the_platform_size_when_known() {
        let ctx = egui::Context::default();
        let (window, _open) = EguiWindow::new(ctx.clone(), (1000.0, 620.0));
        assert_eq!(window.size(), (1000.0, 620.0));

        let mut seen = (0.0, 0.0);
        let _ = ctx.run(input_at(1280.0, 800.0), |_| seen = window.size());
        assert_eq!(seen, (1280.0, 800.0));
    }
}
