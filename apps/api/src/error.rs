//! Error types for the API server.
//!
//! Every failure leaves the server as `{ "code": ..., "message": ... }`.
//!
//! ```text
//! DbError ──► ApiError ──► (StatusCode, Json<ErrorBody>)
//!                 │
//!                 └── DATABASE_ERROR / INTERNAL: detail logged, generic text returned
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sweetshop_core::{CoreError, ValidationError};
use sweetshop_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidCredentials(String),

    /// No bearer credential on a protected route.
    #[error("No token provided")]
    MissingToken,

    /// Credential present but malformed, expired or tampered with.
    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InsufficientStock(String),

    /// Body larger than the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Conflict(_)
            | ApiError::InvalidCredentials(_)
            | ApiError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApiError::MissingToken | ApiError::InvalidToken => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            ApiError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    /// Text sent to the client. Server-side failures stay generic.
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Database(detail) | ApiError::Internal(detail) => {
                tracing::error!(code = self.code(), error = %detail, "Request failed");
            }
            _ => {
                tracing::debug!(code = self.code(), status = status.as_u16(), message = %self, "Request rejected");
            }
        }

        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(_) => ApiError::NotFound("Sweet not found".to_string()),
            CoreError::InsufficientStock { .. } => ApiError::InsufficientStock(err.to_string()),
            CoreError::QuantityOverflow { .. } => ApiError::Validation(err.to_string()),
            CoreError::Validation(inner) => inner.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } if entity == "Item" => {
                ApiError::NotFound("Sweet not found".to_string())
            }
            DbError::NotFound { entity, .. } => ApiError::NotFound(format!("{entity} not found")),
            DbError::UniqueViolation { field, .. } if field == "email" => {
                ApiError::Conflict("Email already exists".to_string())
            }
            DbError::UniqueViolation { field, .. } => {
                ApiError::Conflict(format!("{field} already exists"))
            }
            DbError::Domain(core) => core.into(),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
