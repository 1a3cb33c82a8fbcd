// Client-side error taxonomy for the admin library
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors surfaced by the gateway, the content store and the editors
#[derive(Debug, Error)]
pub enum AdminError {
    // Client-side field validation; blocks submission
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    // Network/transport failure, no response received
    #[error("Transport error: {0}")]
    Transport(String),

    // Server answered with a non-2xx status
    #[error("{}", .message.as_deref().unwrap_or("Request failed"))]
    Status { status: u16, message: Option<String> },

    // Local credential storage could not be read or written
    #[error("Session storage error: {0}")]
    Session(String),

    // Server answered 2xx but the payload was not what we expected
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    pub fn status(status: u16, message: Option<String>) -> Self {
        AdminError::Status { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        AdminError::Transport(message.into())
    }

    pub fn session(message: impl Into<String>) -> Self {
        AdminError::Session(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        AdminError::UnexpectedResponse(message.into())
    }

    /// HTTP status when the server produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AdminError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Field-level messages when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AdminError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::Transport(_) => "TRANSPORT_ERROR",
            AdminError::Status { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                500 => "INTERNAL_SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            AdminError::Session(_) => "SESSION_ERROR",
            AdminError::UnexpectedResponse(_) => "UNEXPECTED_RESPONSE",
            AdminError::Json(_) => "INVALID_JSON",
            AdminError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
