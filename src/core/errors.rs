use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum ReservationError {
    #[error("Invalid input for field `{0}`: {desc}", desc = .1.description)]
    InvalidInput(String, FieldError),
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),
    #[error("Chair {chair_id} is already reserved for {date}")]
    Conflict { date: NaiveDate, chair_id: u8 },
    #[error("{0} not found")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl ReservationError {
    pub fn invalid(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        ReservationError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }

    /// Machine-readable category returned to API callers.
    pub fn kind(&self) -> &'static str {
        match self {
            ReservationError::InvalidInput(..) => "INVALID_INPUT",
            ReservationError::Unauthenticated(_) | ReservationError::InvalidCredentials => "UNAUTHENTICATED",
            ReservationError::EmailAlreadyRegistered(_) | ReservationError::Conflict { .. } => "CONFLICT",
            ReservationError::NotFound(_) => "NOT_FOUND",
            ReservationError::Internal(_) | ReservationError::StorageError(_) | ReservationError::LoggingError(_) => {
                "INTERNAL"
            }
        }
    }
}

pub type ReservationResult<T> = Result<T, ReservationError>;
