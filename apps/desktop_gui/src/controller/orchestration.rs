//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::StatusBanner;

/// Queue `cmd` for the backend worker. Returns `false` and fills `status`
/// when the worker cannot take it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut Option<StatusBanner>,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = Some(StatusBanner::error("UI command queue is full; please retry"));
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend worker is gone");
            *status = Some(StatusBanner::error(
                "Backend command processor disconnected (possible database startup failure); restart the application",
            ));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn full_queue_reports_retry() {
        let (tx, _rx) = bounded(1);
        let mut status = None;
        assert!(dispatch_backend_command(&tx, BackendCommand::LoadAdminOverview, &mut status));
        assert!(status.is_none());

        assert!(!dispatch_backend_command(&tx, BackendCommand::LoadAdminOverview, &mut status));
        assert_eq!(
            status.map(|banner| banner.message),
            Some("UI command queue is full; please retry".to_string())
        );
    }

    #[test]
    fn disconnected_worker_reports_restart() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let mut status = None;
        assert!(!dispatch_backend_command(&tx, BackendCommand::LoadAdminOverview, &mut status));
        assert!(status.is_some_and(|banner| banner.message.contains("disconnected")));
    }
}
