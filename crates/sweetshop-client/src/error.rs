//! # Client Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Transport      │  │  Server said no │  │  Local                  │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Api {status,   │  │  Domain (demo source)   │ │
//! │  │  InvalidResponse│  │   code, message}│  │  NotAuthenticated       │ │
//! │  │                 │  │                 │  │  NotAuthorized          │ │
//! │  │                 │  │                 │  │  Config / Session / Io  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `Network` means "backend unreachable". Everything else is a real
//! answer and is shown to the user unchanged.

use serde::Deserialize;
use sweetshop_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error status.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The server could not be reached (refused, timed out, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with something we could not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Inventory rule violated by the in-memory source.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Action needs a signed-in session.
    #[error("Please log in first")]
    NotAuthenticated,

    /// Signed in, but the role does not allow this action.
    #[error("Admins only")]
    NotAuthorized,

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Session file error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True when the backend could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// True for "not enough stock" from either source.
    pub fn is_insufficient_stock(&self) -> bool {
        match self {
            ClientError::Api { code, .. } => code == "INSUFFICIENT_STOCK",
            ClientError::Domain(CoreError::InsufficientStock { .. }) => true,
            _ => false,
        }
    }

    /// True for "no such item" from either source.
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => *status == 404,
            ClientError::Domain(CoreError::ItemNotFound(_)) => true,
            _ => false,
        }
    }

    /// True for input the source refused as invalid.
    pub fn is_validation(&self) -> bool {
        match self {
            ClientError::Api { code, .. } => code == "VALIDATION_ERROR",
            ClientError::Domain(CoreError::Validation(_)) => true,
            _ => false,
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Domain(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Session(err.to_string())
    }
}

// =============================================================================
// Server Error Body
// =============================================================================

/// Error body as sent by the API (`{code, message}`), tolerant of the
/// older `{error}` shape.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ClientError {
    /// Builds an `Api` error from a status and raw response body.
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let message = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        ClientError::Api {
            status: status.as_u16(),
            code: parsed.code.unwrap_or_default(),
            message,
        }
    }
}
