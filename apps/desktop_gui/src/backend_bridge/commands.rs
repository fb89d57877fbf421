//! Backend commands queued from UI to backend worker.

use shared::{
    domain::{FeedbackId, Role, RoomId, UserId},
    listing::{NewRoom, RoomFilter},
};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    Authenticate {
        username: String,
        password: String,
        role: Role,
    },
    Register {
        username: String,
        password: String,
        display_name: String,
        role: Role,
    },
    LoadRooms {
        filter: RoomFilter,
    },
    LoadOwnerRooms {
        owner: UserId,
    },
    SaveRoom {
        owner: UserId,
        room_id: Option<RoomId>,
        room: NewRoom,
    },
    SetRoomAvailable {
        owner: UserId,
        room_id: RoomId,
        available: bool,
    },
    DeleteOwnRoom {
        owner: UserId,
        room_id: RoomId,
    },
    SubmitFeedback {
        user: UserId,
        text: String,
    },
    LoadAdminOverview,
    DeleteUser {
        user_id: UserId,
    },
    DeleteRoom {
        room_id: RoomId,
    },
    DeleteFeedback {
        feedback_id: FeedbackId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Authenticate { .. } => "authenticate",
            BackendCommand::Register { .. } => "register",
            BackendCommand::LoadRooms { .. } => "load_rooms",
            BackendCommand::LoadOwnerRooms { .. } => "load_owner_rooms",
            BackendCommand::SaveRoom { .. } => "save_room",
            BackendCommand::SetRoomAvailable { .. } => "set_room_available",
            BackendCommand::DeleteOwnRoom { .. } => "delete_own_room",
            BackendCommand::SubmitFeedback { .. } => "submit_feedback",
            BackendCommand::LoadAdminOverview => "load_admin_overview",
            BackendCommand::DeleteUser { .. } => "delete_user",
            BackendCommand::DeleteRoom { .. } => "delete_room",
            BackendCommand::DeleteFeedback { .. } => "delete_feedback",
        }
    }
}
