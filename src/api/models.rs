use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::ReservationError;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Both fields are optional at the wire level so that a missing one is
/// reported as a validation error instead of a body rejection.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[schema(example = "2024-06-08")]
    pub date: Option<String>,
    #[schema(example = 1)]
    pub chair_id: Option<i64>,
}

impl CreateReservationRequest {
    pub fn into_parts(self) -> Result<(String, i64), ReservationError> {
        let date = self
            .date
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ReservationError::invalid("date", "Missing date", "date is required"))?;
        let chair_id = self
            .chair_id
            .ok_or_else(|| ReservationError::invalid("chairId", "Missing chair", "chairId is required"))?;
        Ok((date, chair_id))
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// First day, `YYYY-MM-DD`; defaults to today.
    pub from: Option<String>,
    /// Last day (inclusive), `YYYY-MM-DD`.
    pub to: Option<String>,
}

// Error response struct
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

// Newtype wrapper for ReservationError to implement IntoResponse
pub struct ApiError(pub ReservationError);

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let kind = self.0.kind().to_string();
        let (status, error_message) = match self.0 {
            ReservationError::InvalidInput(_, field) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {}", field.field, field.description),
            ),
            ReservationError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ReservationError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            ReservationError::EmailAlreadyRegistered(email) => {
                (StatusCode::CONFLICT, format!("Email {} already registered", email))
            }
            err @ ReservationError::Conflict { .. } => (StatusCode::CONFLICT, err.to_string()),
            ReservationError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            err @ (ReservationError::Internal(_)
            | ReservationError::StorageError(_)
            | ReservationError::LoggingError(_)) => {
                error!(error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: error_message,
                kind,
            }),
        )
            .into_response()
    }
}
