use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Validation,
    Conflict,
    Connection,
    Internal,
}

/// Failure crossing from the persistence layer to the UI. Views turn these
/// into alert text; nothing here is allowed to reach the event loop as a panic.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ServiceError {
    pub code: ErrorCode,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Connection, message)
    }

    /// Recover a `ServiceError` raised inside the storage layer, or classify
    /// anything else as a connection failure.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ServiceError>() {
            Some(service) => service.clone(),
            None => Self::connection(format!("{err:#}")),
        }
    }

    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::Connection => {
                "Unable to connect to the database. Please try again later.".to_string()
            }
            ErrorCode::Internal => "An unexpected error occurred.".to_string(),
            ErrorCode::Unauthorized
            | ErrorCode::NotFound
            | ErrorCode::Validation
            | ErrorCode::Conflict => self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user type: {0}")]
pub struct UnknownRole(pub String);
