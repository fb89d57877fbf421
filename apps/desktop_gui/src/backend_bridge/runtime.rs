//! Runtime bridge between the UI command queue and the database.
//!
//! The worker owns its own tokio runtime so SQL never runs on the UI thread.
//! Every completion goes back through `ui_tx`; the UI loop decides whether it
//! leads to a navigation.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use shared::error::ServiceError;
use storage::{Directory, Storage};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{AdminOverview, UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, database_url: String) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let directory: Arc<dyn Directory> = match Storage::new(&database_url).await {
                Ok(storage) => Arc::new(storage),
                Err(err) => {
                    tracing::error!(database_url = %database_url, "failed to open database: {err:#}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_service(
                        UiErrorContext::BackendStartup,
                        &ServiceError::connection(format!("{err:#}")),
                    )));
                    return;
                }
            };
            tracing::info!(database_url = %database_url, "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::BackendReady);

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(directory.as_ref(), cmd, &ui_tx).await;
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

pub async fn handle_command(directory: &dyn Directory, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    let command = cmd.name();
    let (context, result) = match cmd {
        BackendCommand::Authenticate {
            username,
            password,
            role,
        } => (
            UiErrorContext::Login,
            directory
                .authenticate(&username, &password, role)
                .await
                .map(|user| match user {
                    Some(user) => vec![UiEvent::Authenticated(user)],
                    None => vec![UiEvent::LoginRejected],
                }),
        ),
        BackendCommand::Register {
            username,
            password,
            display_name,
            role,
        } => (
            UiErrorContext::Registration,
            directory
                .register_user(&username, &password, &display_name, role)
                .await
                .map(|_| {
                    vec![UiEvent::Registered {
                        username: username.trim().to_string(),
                    }]
                }),
        ),
        BackendCommand::LoadRooms { filter } => (UiErrorContext::Rooms, async {
            let rooms = directory.list_rooms(&filter).await?;
            let locations = directory.list_locations().await?;
            Ok::<_, anyhow::Error>(vec![UiEvent::RoomsLoaded { rooms, locations }])
        }
        .await),
        BackendCommand::LoadOwnerRooms { owner } => (
            UiErrorContext::Rooms,
            directory
                .rooms_for_owner(owner)
                .await
                .map(|rooms| vec![UiEvent::OwnerRoomsLoaded(rooms)]),
        ),
        BackendCommand::SaveRoom {
            owner,
            room_id,
            room,
        } => (UiErrorContext::Rooms, async {
            let message = match room_id {
                Some(room_id) => {
                    directory.update_room(room_id, owner, &room).await?;
                    "Room updated successfully!"
                }
                None => {
                    directory.add_room(owner, &room).await?;
                    "Room added successfully!"
                }
            };
            let rooms = directory.rooms_for_owner(owner).await?;
            Ok::<_, anyhow::Error>(vec![
                UiEvent::Info(message.to_string()),
                UiEvent::OwnerRoomsLoaded(rooms),
            ])
        }
        .await),
        BackendCommand::SetRoomAvailable {
            owner,
            room_id,
            available,
        } => (UiErrorContext::Rooms, async {
            directory.set_room_available(room_id, owner, available).await?;
            let rooms = directory.rooms_for_owner(owner).await?;
            Ok::<_, anyhow::Error>(vec![UiEvent::OwnerRoomsLoaded(rooms)])
        }
        .await),
        BackendCommand::DeleteOwnRoom { owner, room_id } => (UiErrorContext::Rooms, async {
            directory.delete_room(room_id).await?;
            let rooms = directory.rooms_for_owner(owner).await?;
            Ok::<_, anyhow::Error>(vec![
                UiEvent::Info("Room deleted successfully!".to_string()),
                UiEvent::OwnerRoomsLoaded(rooms),
            ])
        }
        .await),
        BackendCommand::SubmitFeedback { user, text } => (
            UiErrorContext::Feedback,
            directory
                .submit_feedback(user, &text)
                .await
                .map(|_| vec![UiEvent::FeedbackSubmitted]),
        ),
        BackendCommand::LoadAdminOverview => {
            (UiErrorContext::Admin, admin_overview(directory).await)
        }
        BackendCommand::DeleteUser { user_id } => (UiErrorContext::Admin, async {
            directory.delete_user(user_id).await?;
            admin_overview(directory).await
        }
        .await),
        BackendCommand::DeleteRoom { room_id } => (UiErrorContext::Admin, async {
            directory.delete_room(room_id).await?;
            admin_overview(directory).await
        }
        .await),
        BackendCommand::DeleteFeedback { feedback_id } => (UiErrorContext::Admin, async {
            directory.delete_feedback(feedback_id).await?;
            admin_overview(directory).await
        }
        .await),
    };

    let events = match result {
        Ok(events) => events,
        Err(err) => {
            tracing::warn!(command, "backend command failed: {err:#}");
            vec![UiEvent::Error(UiError::from_service(
                context,
                &ServiceError::from_anyhow(&err),
            ))]
        }
    };
    for event in events {
        if ui_tx.send(event).is_err() {
            tracing::debug!(command, "ui event channel closed");
            return;
        }
    }
}

async fn admin_overview(directory: &dyn Directory) -> anyhow::Result<Vec<UiEvent>> {
    let overview = AdminOverview {
        users: directory.list_users().await?,
        rooms: directory.list_rooms(&Default::default()).await?,
        feedback: directory.list_feedback().await?,
        counts: directory.user_counts().await?,
    };
    Ok(vec![UiEvent::AdminOverviewLoaded(overview)])
}
