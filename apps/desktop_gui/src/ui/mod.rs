//! UI layer for the desktop client: app shell, screens, themes, and the
//! egui side of the navigation window.

pub mod app;
pub mod screens;
pub mod theme;
pub mod views;
pub mod window;

pub use app::{PersistedDesktopSettings, StudentNestApp, SETTINGS_STORAGE_KEY};
