use eframe::egui;
use navigation::{Controller, TransitionKind, TransitionSpec};
use shared::{
    domain::{Role, RoomId},
    listing::{PriceBand, RoomFilter, RoomListing},
};

use super::{dashboard_header, NavIntent, Screen, ScreenContext};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::views;

#[derive(Debug, Default)]
pub struct StudentDashboard {
    rooms: Vec<RoomListing>,
    locations: Vec<String>,
    filter: RoomFilter,
    selected: Option<RoomId>,
    requested: bool,
    loading: bool,
}

impl StudentDashboard {
    fn refresh(&mut self, ctx: &mut ScreenContext<'_>) {
        self.requested = true;
        self.loading = ctx.send(BackendCommand::LoadRooms {
            filter: self.filter.clone(),
        });
    }

    fn selected_room(&self) -> Option<&RoomListing> {
        let selected = self.selected?;
        self.rooms.iter().find(|room| room.room_id == selected)
    }

    fn open_feedback(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Open {
            descriptor: views::feedback(),
            transition: TransitionSpec::of(TransitionKind::SlideLeft),
            back_to: Some(views::dashboard_for(Role::Student).back_target()),
        });
    }

    fn open_about(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Open {
            descriptor: views::about(),
            transition: TransitionSpec::of(TransitionKind::SlideUp),
            back_to: None,
        });
    }

    fn show_filters(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label("Location");
            let current = self.filter.location.clone();
            egui::ComboBox::from_id_salt("student_location_filter")
                .selected_text(current.as_deref().unwrap_or("All Locations"))
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.filter.location, None, "All Locations")
                        .changed();
                    for location in &self.locations {
                        changed |= ui
                            .selectable_value(
                                &mut self.filter.location,
                                Some(location.clone()),
                                location,
                            )
                            .changed();
                    }
                });

            ui.label("Price");
            egui::ComboBox::from_id_salt("student_price_filter")
                .selected_text(self.filter.price.label())
                .show_ui(ui, |ui| {
                    for band in PriceBand::ALL {
                        changed |= ui
                            .selectable_value(&mut self.filter.price, band, band.label())
                            .changed();
                    }
                });

            changed |= ui
                .checkbox(&mut self.filter.available_only, "Available only")
                .changed();

            if ui.button("Clear").clicked() {
                self.filter = RoomFilter::default();
                changed = true;
            }
            if self.loading {
                ui.spinner();
            }
        });
        if changed {
            self.refresh(ctx);
        }
    }

    fn show_room_list(&mut self, ui: &mut egui::Ui) {
        if self.rooms.is_empty() {
            ui.weak(if self.loading {
                "Loading rooms..."
            } else {
                "No rooms match your filters."
            });
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("student_rooms")
            .show(ui, |ui| {
                for room in &self.rooms {
                    let selected = self.selected == Some(room.room_id);
                    let text = format!(
                        "{}  ·  {}\n{}",
                        room.location,
                        room.formatted_price(),
                        room.short_description()
                    );
                    if ui.selectable_label(selected, text).clicked() {
                        self.selected = Some(room.room_id);
                    }
                    ui.add_space(4.0);
                }
            });
    }

    fn show_room_details(&self, ui: &mut egui::Ui) {
        let Some(room) = self.selected_room() else {
            ui.weak("Select a room to see its details.");
            return;
        };
        ui.heading(&room.location);
        ui.label(egui::RichText::new(room.formatted_price()).strong());
        ui.label(if room.available {
            "Available"
        } else {
            "Not available"
        });
        ui.separator();
        egui::Grid::new("room_details").num_columns(2).show(ui, |ui| {
            ui.label("Owner");
            ui.label(&room.owner_name);
            ui.end_row();
            ui.label("Type");
            ui.label(room.room_type.as_deref().unwrap_or("-"));
            ui.end_row();
            ui.label("Contact");
            ui.label(room.contact_number.as_deref().unwrap_or("-"));
            ui.end_row();
            ui.label("Listed");
            ui.label(room.created_at.format("%d %b %Y").to_string());
            ui.end_row();
        });
        ui.add_space(6.0);
        ui.label(&room.description);
        if let Some(link) = room.map_link.as_deref().filter(|link| !link.trim().is_empty()) {
            ui.hyperlink_to("Open in maps", link);
        }
    }
}

impl Controller for StudentDashboard {}

impl Screen for StudentDashboard {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        if !self.requested {
            self.refresh(ctx);
        }

        let mut feedback = false;
        let mut about = false;
        let mut logout = false;
        dashboard_header(ui, "Find a Room", ctx.user, |ui| {
            logout = ui.button("Logout").clicked();
            feedback = ui.button("Feedback").clicked();
            about = ui.button("About Us").clicked();
        });
        if logout {
            ctx.navigate(NavIntent::Logout);
        } else if feedback {
            self.open_feedback(ctx);
        } else if about {
            self.open_about(ctx);
        }

        self.show_filters(ui, ctx);
        ui.separator();
        ui.columns(2, |columns| {
            self.show_room_list(&mut columns[0]);
            self.show_room_details(&mut columns[1]);
        });
    }

    fn on_event(&mut self, event: &UiEvent, _ctx: &mut ScreenContext<'_>) {
        match event {
            UiEvent::RoomsLoaded { rooms, locations } => {
                self.loading = false;
                self.rooms = rooms.clone();
                self.locations = locations.clone();
                if self.selected_room().is_none() {
                    self.selected = self.rooms.first().map(|room| room.room_id);
                }
            }
            UiEvent::Error(_) => self.loading = false,
            _ => {}
        }
    }
}
