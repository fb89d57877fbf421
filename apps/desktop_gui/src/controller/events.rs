//! UI/backend events and error modeling for the desktop controller layer.

use shared::{
    domain::{RoleCount, SessionUser, UserSummary},
    error::{ErrorCode, ServiceError},
    listing::{FeedbackEntry, RoomListing},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub users: Vec<UserSummary>,
    pub rooms: Vec<RoomListing>,
    pub feedback: Vec<FeedbackEntry>,
    pub counts: Vec<RoleCount>,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    BackendReady,
    Info(String),
    Error(UiError),
    Authenticated(SessionUser),
    LoginRejected,
    Registered {
        username: String,
    },
    RoomsLoaded {
        rooms: Vec<RoomListing>,
        locations: Vec<String>,
    },
    OwnerRoomsLoaded(Vec<RoomListing>),
    FeedbackSubmitted,
    AdminOverviewLoaded(AdminOverview),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Connection,
    Validation,
    NotFound,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Login,
    Registration,
    Rooms,
    Feedback,
    Admin,
    Navigation,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_service(context: UiErrorContext, err: &ServiceError) -> Self {
        let category = match err.code {
            ErrorCode::Unauthorized => UiErrorCategory::Auth,
            ErrorCode::Connection => UiErrorCategory::Connection,
            ErrorCode::Validation | ErrorCode::Conflict => UiErrorCategory::Validation,
            ErrorCode::NotFound => UiErrorCategory::NotFound,
            ErrorCode::Internal => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.user_message(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid credential")
            || message_lower.contains("unauthorized")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("required")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("database")
            || message_lower.contains("connection")
            || message_lower.contains("disconnected")
            || message_lower.contains("timed out")
            || message_lower.contains("queue is full")
        {
            UiErrorCategory::Connection
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Info,
    Error,
}

/// One-line message shown at the bottom of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub severity: StatusSeverity,
    pub message: String,
}

impl StatusBanner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: StatusSeverity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: StatusSeverity::Error,
            message: message.into(),
        }
    }

    pub fn from_ui_error(err: &UiError) -> Self {
        Self::error(format!("{}: {}", err_label(err.category()), err.message()))
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentication",
        UiErrorCategory::Connection => "Database",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Unknown => "Error",
    }
}
