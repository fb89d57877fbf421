use std::{fmt, io};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    View,
    Stylesheet,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::View => f.write_str("view"),
            ResourceKind::Stylesheet => f.write_str("stylesheet"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },
    #[error("failed to read {kind} {id}: {source}")]
    Io {
        kind: ResourceKind,
        id: String,
        #[source]
        source: io::Error,
    },
}

impl ResourceError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("a transition is already in flight")]
    Busy,
    #[error("primary window has not been set")]
    NotInitialized,
    #[error("controller does not support {capability}")]
    ControllerMismatch { capability: &'static str },
    #[error("controller is busy")]
    ControllerBusy,
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("transition aborted: {0}")]
    Aborted(String),
}

impl NavigationError {
    /// Text for the non-fatal notification shown at the navigation boundary.
    pub fn user_message(&self) -> String {
        match self {
            NavigationError::Busy => "Please wait for the current page to finish loading.".into(),
            NavigationError::NotInitialized => {
                "The application window is not ready yet. Please try again.".into()
            }
            NavigationError::ControllerMismatch { .. } => {
                "The requested page cannot accept this action.".into()
            }
            NavigationError::ControllerBusy => {
                "The requested page is busy. Please try again.".into()
            }
            NavigationError::Resource(_) => {
                "Could not load the requested page. Please try again.".into()
            }
            NavigationError::Aborted(_) => {
                "Navigation was interrupted before the page finished loading.".into()
            }
        }
    }
}
