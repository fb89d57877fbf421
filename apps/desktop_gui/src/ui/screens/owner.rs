use eframe::egui;
use navigation::{Controller, TransitionKind, TransitionSpec};
use shared::{
    domain::{Role, RoomId},
    listing::{NewRoom, RoomListing},
};

use super::{dashboard_header, NavIntent, Screen, ScreenContext};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::views;

/// Text buffers behind the add/edit form.
#[derive(Debug, Default, Clone, PartialEq)]
struct RoomForm {
    location: String,
    price: String,
    description: String,
    room_type: String,
    contact_number: String,
    map_link: String,
}

impl RoomForm {
    fn from_listing(room: &RoomListing) -> Self {
        Self {
            location: room.location.clone(),
            price: format!("{:.0}", room.price),
            description: room.description.clone(),
            room_type: room.room_type.clone().unwrap_or_default(),
            contact_number: room.contact_number.clone().unwrap_or_default(),
            map_link: room.map_link.clone().unwrap_or_default(),
        }
    }

    fn to_new_room(&self) -> Result<NewRoom, String> {
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .map_err(|_| "Please enter a valid price.".to_string())?;
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let room = NewRoom {
            location: self.location.trim().to_string(),
            price,
            description: self.description.trim().to_string(),
            room_type: optional(&self.room_type),
            contact_number: optional(&self.contact_number),
            map_link: optional(&self.map_link),
        };
        room.validate().map_err(|err| err.user_message())?;
        Ok(room)
    }
}

#[derive(Debug, Default)]
pub struct OwnerDashboard {
    rooms: Vec<RoomListing>,
    form: RoomForm,
    editing: Option<RoomId>,
    confirm_delete: Option<RoomId>,
    requested: bool,
    saving: bool,
}

impl OwnerDashboard {
    fn refresh(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(owner) = ctx.user.map(|user| user.user_id) else {
            return;
        };
        self.requested = true;
        ctx.send(BackendCommand::LoadOwnerRooms { owner });
    }

    fn edit(&mut self, room_id: RoomId) {
        if let Some(room) = self.rooms.iter().find(|room| room.room_id == room_id) {
            self.form = RoomForm::from_listing(room);
            self.editing = Some(room_id);
        }
    }

    fn reset_form(&mut self) {
        self.form = RoomForm::default();
        self.editing = None;
    }

    fn save(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(owner) = ctx.user.map(|user| user.user_id) else {
            ctx.error("Please log in again.");
            return;
        };
        let room = match self.form.to_new_room() {
            Ok(room) => room,
            Err(message) => {
                ctx.error(message);
                return;
            }
        };
        self.saving = ctx.send(BackendCommand::SaveRoom {
            owner,
            room_id: self.editing,
            room,
        });
    }

    fn delete(&mut self, room_id: RoomId, ctx: &mut ScreenContext<'_>) {
        let Some(owner) = ctx.user.map(|user| user.user_id) else {
            return;
        };
        self.confirm_delete = None;
        if self.editing == Some(room_id) {
            self.reset_form();
        }
        ctx.send(BackendCommand::DeleteOwnRoom { owner, room_id });
    }

    fn set_available(&mut self, room_id: RoomId, available: bool, ctx: &mut ScreenContext<'_>) {
        let Some(owner) = ctx.user.map(|user| user.user_id) else {
            return;
        };
        ctx.send(BackendCommand::SetRoomAvailable {
            owner,
            room_id,
            available,
        });
    }

    fn open_feedback(&mut self, ctx: &mut ScreenContext<'_>) {
        ctx.navigate(NavIntent::Open {
            descriptor: views::feedback(),
            transition: TransitionSpec::of(TransitionKind::SlideLeft),
            back_to: Some(views::dashboard_for(Role::HouseOwner).back_target()),
        });
    }

    fn show_form(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        ui.heading(if self.editing.is_some() {
            "Update room"
        } else {
            "Add a room"
        });
        egui::Grid::new("owner_room_form")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                let rows: [(&str, &mut String); 5] = [
                    ("Location", &mut self.form.location),
                    ("Monthly rent", &mut self.form.price),
                    ("Room type", &mut self.form.room_type),
                    ("Contact number", &mut self.form.contact_number),
                    ("Map link", &mut self.form.map_link),
                ];
                for (label, value) in rows {
                    ui.label(label);
                    ui.text_edit_singleline(value);
                    ui.end_row();
                }
                ui.label("Description");
                ui.text_edit_multiline(&mut self.form.description);
                ui.end_row();
            });

        ui.horizontal(|ui| {
            let label = if self.editing.is_some() { "Update" } else { "Add" };
            if ui
                .add_enabled(!self.saving, egui::Button::new(label))
                .clicked()
            {
                self.save(ctx);
            }
            if ui.button("Clear").clicked() {
                self.reset_form();
            }
            if self.saving {
                ui.spinner();
            }
        });
    }

    fn show_rooms(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        ui.heading("My rooms");
        if self.rooms.is_empty() {
            ui.weak("You have not listed any rooms yet.");
            return;
        }

        let mut edit = None;
        let mut delete = None;
        let mut toggle = None;
        egui::ScrollArea::vertical()
            .id_salt("owner_rooms")
            .show(ui, |ui| {
                for room in &self.rooms {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&room.location).strong());
                                ui.label(room.formatted_price());
                                ui.weak(room.short_description());
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if self.confirm_delete == Some(room.room_id) {
                                        if ui.button("Cancel").clicked() {
                                            delete = Some(None);
                                        }
                                        if ui.button("Confirm delete").clicked() {
                                            delete = Some(Some(room.room_id));
                                        }
                                    } else {
                                        if ui.button("Delete").clicked() {
                                            self.confirm_delete = Some(room.room_id);
                                        }
                                        if ui.button("Edit").clicked() {
                                            edit = Some(room.room_id);
                                        }
                                        let mut available = room.available;
                                        if ui.checkbox(&mut available, "Available").changed() {
                                            toggle = Some((room.room_id, available));
                                        }
                                    }
                                },
                            );
                        });
                    });
                }
            });

        if let Some(room_id) = edit {
            self.edit(room_id);
        }
        match delete {
            Some(Some(room_id)) => self.delete(room_id, ctx),
            Some(None) => self.confirm_delete = None,
            None => {}
        }
        if let Some((room_id, available)) = toggle {
            self.set_available(room_id, available, ctx);
        }
    }
}

impl Controller for OwnerDashboard {}

impl Screen for OwnerDashboard {
    fn show(&mut self, ui: &mut egui::Ui, ctx: &mut ScreenContext<'_>) {
        if !self.requested {
            self.refresh(ctx);
        }

        let mut feedback = false;
        let mut logout = false;
        dashboard_header(ui, "House Owner Dashboard", ctx.user, |ui| {
            logout = ui.button("Logout").clicked();
            feedback = ui.button("Feedback").clicked();
        });
        if logout {
            ctx.navigate(NavIntent::Logout);
        } else if feedback {
            self.open_feedback(ctx);
        }

        ui.columns(2, |columns| {
            self.show_form(&mut columns[0], ctx);
            self.show_rooms(&mut columns[1], ctx);
        });
    }

    fn on_event(&mut self, event: &UiEvent, _ctx: &mut ScreenContext<'_>) {
        match event {
            UiEvent::OwnerRoomsLoaded(rooms) => {
                self.rooms = rooms.clone();
                if self.saving {
                    self.saving = false;
                    self.reset_form();
                }
            }
            UiEvent::Error(_) => self.saving = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::screens::test_support::Harness;
    use shared::domain::{SessionUser, UserId};

    fn owner() -> SessionUser {
        SessionUser {
            user_id: UserId(3),
            username: "owner".into(),
            display_name: "Owner".into(),
            role: Role::HouseOwner,
        }
    }

    fn form() -> RoomForm {
        RoomForm {
            location: " Mirpur 10 ".into(),
            price: "7000".into(),
            description: "Corner room".into(),
            room_type: "".into(),
            contact_number: "017".into(),
            map_link: "  ".into(),
        }
    }

    #[test]
    fn form_trims_and_drops_blank_optionals() {
        let room = form().to_new_room().expect("valid");
        assert_eq!(room.location, "Mirpur 10");
        assert_eq!(room.price, 7_000.0);
        assert_eq!(room.room_type, None);
        assert_eq!(room.contact_number.as_deref(), Some("017"));
        assert_eq!(room.map_link, None);
    }

    #[test]
    fn bad_price_is_reported() {
        let mut bad = form();
        bad.price = "seven thousand".into();
        assert_eq!(
            bad.to_new_room().expect_err("invalid"),
            "Please enter a valid price."
        );
    }

    #[test]
    fn editing_sends_update_for_the_selected_room() {
        let mut harness = Harness::new(Some(owner()));
        let mut screen = OwnerDashboard::default();
        screen.form = form();
        screen.editing = Some(RoomId(12));

        harness.with(|ctx| screen.save(ctx));

        match harness.commands().as_slice() {
            [BackendCommand::SaveRoom { owner, room_id, .. }] => {
                assert_eq!(*owner, UserId(3));
                assert_eq!(*room_id, Some(RoomId(12)));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
        assert!(screen.saving);
    }

    #[test]
    fn refreshed_list_after_save_clears_the_form() {
        let mut harness = Harness::new(Some(owner()));
        let mut screen = OwnerDashboard {
            form: form(),
            editing: Some(RoomId(12)),
            saving: true,
            ..OwnerDashboard::default()
        };

        harness.with(|ctx| screen.on_event(&UiEvent::OwnerRoomsLoaded(Vec::new()), ctx));

        assert!(!screen.saving);
        assert_eq!(screen.form, RoomForm::default());
        assert_eq!(screen.editing, None);
    }

    #[test]
    fn without_a_session_nothing_is_sent() {
        let mut harness = Harness::new(None);
        let mut screen = OwnerDashboard::default();
        harness.with(|ctx| {
            screen.refresh(ctx);
            screen.delete(RoomId(1), ctx);
        });
        assert!(harness.commands().is_empty());
        assert!(!screen.requested);
    }
}
