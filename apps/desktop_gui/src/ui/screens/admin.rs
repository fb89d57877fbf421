use eframe::egui;
use navigation::Controller;
use shared::domain::{FeedbackId, Role, RoomId, UserId};

use super::{dashboard_header, NavIntent, Screen, ScreenContext};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{AdminOverview, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AdminTab {
    #[default]
    Users,
    Rooms,
    Feedback,
}

/// Row the admin asked to delete; removal waits for a second click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingDelete {
    User(UserId),
    Room(RoomId),
    Feedback(FeedbackId),
}

impl PendingDelete {
    fn command(self) -> BackendCommand {
        match self {
            PendingDelete::User(user_id) => BackendCommand::DeleteUser { user_id },
            PendingDelete::Room(room_id) => BackendCommand::DeleteRoom { room_id },
            PendingDelete::Feedback(feedback_id) => BackendCommand::DeleteFeedback { feedback_id },
        }
    }
}

#[derive(Debug, Default)]
pub struct AdminDashboard {
    overview: Option<AdminOverview>,
    tab: AdminTab,
    pending_delete: Option<PendingDelete>,
    requested: bool,
    loading: bool,
}

impl AdminDashboard {
    fn refresh(&mut self, ctx: &mut ScreenContext<'_>) {
        self.requested = true;
        self.loading = ctx.send(BackendCommand::LoadAdminOverview);
    }

    /// First click arms the delete, a second click on the same row sends it.
    fn request_delete(&mut self, target: PendingDelete, ctx: &mut ScreenContext<'_>) {
        if self.pending_delete == Some(target) {
            self.pending_delete = None;
            self.loading = ctx.send(target.command());
        } else {
            self.pending_delete = Some(target);
        }
    }

    fn count_for(&self, role: Role) -> i64 {
        self.overview
            .as_ref()
            .and_then(|overview| overview.counts.iter().find(|entry| entry.role == role))
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    fn delete_button(&self, ui: &mut egui::Ui, target: PendingDelete) -> bool {
        let armed = self.pending_delete == Some(target);
        let label = if armed { "Confirm delete" } else { "Delete" };
        ui.button(label).clicked()
    }

    fn show_stats(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for role in Role::ALL {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.weak(format!("{}s", role.label()));
                        ui.heading(self.count_for(role).to_string());
                    });
                });
            }
            let rooms = self.overview.as_ref().map_or(0, |overview| overview.rooms.len());
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.weak("Rooms");
                    ui.heading(rooms.to_string());
                });
            });
        });
    }

    fn show_table(&self, ui: &mut egui::Ui) -> Option<PendingDelete> {
        let overview = self.overview.as_ref()?;
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("admin_table")
            .show(ui, |ui| {
                egui::Grid::new(("admin_grid", self.tab as u8))
                    .num_columns(4)
                    .striped(true)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| match self.tab {
                        AdminTab::Users => {
                            for user in &overview.users {
                                ui.label(user.user_id.to_string());
                                ui.label(&user.username);
                                ui.label(format!("{} ({})", user.display_name, user.role));
                                let target = PendingDelete::User(user.user_id);
                                if self.delete_button(ui, target) {
                                    clicked = Some(target);
                                }
                                ui.end_row();
                            }
                        }
                        AdminTab::Rooms => {
                            for room in &overview.rooms {
                                ui.label(&room.location);
                                ui.label(room.formatted_price());
                                ui.label(&room.owner_name);
                                let target = PendingDelete::Room(room.room_id);
                                if self.delete_button(ui, target) {
                                    clicked = Some(target);
                                }
                                ui.end_row();
                            }
                        }
                        AdminTab::Feedback => {
                            for entry in &overview.feedback {
                                ui.label(entry.created_at.format("%Y-%m-%d %H:%M").to_string());
                                ui.label(&entry.username);
                                ui.label(&entry.text);
                                let target = PendingDelete::Feedback(entry.feedback_id);
                                if self.delete_button(ui, target) {
                                    clicked = Some(target);
                                }
                                ui.end_row();
                            }
                        }
                    });
            });
        clicked
    }
}

impl Controller for AdminDashboard {}

impl Screen for AdminDashboard {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        if !self.requested {
            self.refresh(ctx);
        }

        let mut refresh = false;
        let mut logout = false;
        dashboard_header(ui, "Admin Dashboard", ctx.user, |ui| {
            logout = ui.button("Logout").clicked();
            refresh = ui.button("Refresh").clicked();
        });
        if logout {
            ctx.navigate(NavIntent::Logout);
            return;
        }
        if refresh {
            self.refresh(ctx);
        }

        self.show_stats(ui);
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, AdminTab::Users, "Users");
            ui.selectable_value(&mut self.tab, AdminTab::Rooms, "Rooms");
            ui.selectable_value(&mut self.tab, AdminTab::Feedback, "Feedback & Issues");
            if self.loading {
                ui.spinner();
            }
        });
        ui.separator();

        if self.overview.is_none() {
            ui.weak("Loading...");
            return;
        }
        if let Some(target) = self.show_table(ui) {
            self.request_delete(target, ctx);
        }
    }

    fn on_event(&mut self, event: &UiEvent, _ctx: &mut ScreenContext<'_>) {
        match event {
            UiEvent::AdminOverviewLoaded(overview) => {
                self.loading = false;
                self.overview = Some(overview.clone());
            }
            UiEvent::Error(_) => self.loading = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::screens::test_support::Harness;
    use shared::domain::RoleCount;

    #[test]
    fn delete_needs_two_clicks_on_the_same_row() {
        let mut harness = Harness::new(None);
        let mut screen = AdminDashboard::default();

        harness.with(|ctx| {
            screen.request_delete(PendingDelete::User(UserId(4)), ctx);
            screen.request_delete(PendingDelete::Room(RoomId(2)), ctx);
        });
        assert!(harness.commands().is_empty());
        assert_eq!(screen.pending_delete, Some(PendingDelete::Room(RoomId(2))));

        harness.with(|ctx| screen.request_delete(PendingDelete::Room(RoomId(2)), ctx));
        match harness.commands().as_slice() {
            [BackendCommand::DeleteRoom { room_id }] => assert_eq!(*room_id, RoomId(2)),
            other => panic!("unexpected commands: {other:?}"),
        }
        assert_eq!(screen.pending_delete, None);
    }

    #[test]
    fn counts_default_to_zero_until_loaded() {
        let mut harness = Harness::new(None);
        let mut screen = AdminDashboard::default();
        assert_eq!(screen.count_for(Role::Student), 0);

        let overview = AdminOverview {
            users: Vec::new(),
            rooms: Vec::new(),
            feedback: Vec::new(),
            counts: vec![RoleCount {
                role: Role::Student,
                count: 12,
            }],
        };
        harness.with(|ctx| screen.on_event(&UiEvent::AdminOverviewLoaded(overview), ctx));

        assert_eq!(screen.count_for(Role::Student), 12);
        assert_eq!(screen.count_for(Role::HouseOwner), 0);
    }
}
