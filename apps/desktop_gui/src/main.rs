mod backend_bridge;
mod config;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::config::{load_config, Args};
use crate::controller::events::UiEvent;
use crate::ui::{views, PersistedDesktopSettings, StudentNestApp, SETTINGS_STORAGE_KEY};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::info!(
        database_url = %config.database_url,
        asset_dir = %config.asset_dir.display(),
        "starting StudentNest"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    runtime::launch(cmd_rx, ui_tx, config.database_url.clone());

    let login = views::login();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(login.title())
            .with_inner_size([login.width(), login.height()])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "StudentNest",
        options,
        Box::new(move |cc| {
            let persisted_settings = cc
                .storage
                .and_then(|storage| {
                    storage.get_string(SETTINGS_STORAGE_KEY).and_then(|text| {
                        serde_json::from_str::<PersistedDesktopSettings>(&text).ok()
                    })
                })
                .unwrap_or_default();
            Ok(Box::new(StudentNestApp::new(
                &cc.egui_ctx,
                &config,
                cmd_tx,
                ui_rx,
                persisted_settings,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop client exited with an error: {err}"))
}
