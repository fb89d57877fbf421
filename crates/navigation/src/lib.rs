//! View navigation and transition engine.
//!
//! A [`Navigator`] owns the single application window, loads views through a
//! [`ResourceLoader`], animates the hand-off between the outgoing and incoming
//! roots with a [`TransitionEngine`], and records cross-view state in a
//! [`NavigationSession`]. Everything runs on the UI loop thread; the loop
//! drives animations by calling [`Navigator::tick`] once per frame.

pub mod controller;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod navigator;
pub mod session;
pub mod transition;
pub mod window;

pub use controller::{AsAny, Controller, ControllerHandle, SupportsBackTarget};
pub use descriptor::{
    BackTarget, StylesheetId, TransitionKind, TransitionSpec, ViewDescriptor, ViewId,
};
pub use error::{NavigationError, ResourceError, ResourceKind};
pub use loader::{LoadedView, ResourceLoader, StyleHandle};
pub use navigator::{CancellationToken, NavigationConfig, NavigationRequest, Navigator};
pub use session::{NavigationSession, DEFAULT_HISTORY_LIMIT};
pub use transition::{
    SceneChange, TransitionEngine, TransitionEvent, TransitionPhase, DEFAULT_MAX_TRANSITION,
};
pub use window::{Presentation, ViewRoot, WindowController, WindowSurface};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
