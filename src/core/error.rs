//! Typed error handling for the trip ledger
//!
//! Every fallible operation in the crate returns [`LedgerResult`]. Callers can
//! match on the specific variant instead of inspecting a message string:
//!
//! ```rust,ignore
//! match service.start(&trip_id).await {
//!     Ok(trip) => println!("{} is on the road", trip.display_id),
//!     Err(LedgerError::Trip(TripError::InvalidState { status, .. })) => {
//!         println!("cannot start a {} trip", status);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! # Error Categories
//!
//! - [`TripError`]: lifecycle and lookup failures
//! - [`ValidationError`]: malformed input
//! - [`StorageError`]: repository backend failures
//! - [`ConfigError`]: configuration loading and validation

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::core::trip::TripStatus;

/// The main error type for the ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Trip(#[from] TripError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LedgerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Trip(e) => e.status_code(),
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LedgerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::Trip(e) => e.error_code(),
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::Storage(_) => "STORAGE_ERROR",
            LedgerError::Config(_) => "CONFIG_ERROR",
            LedgerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            LedgerError::Trip(TripError::NotFound { id }) => {
                Some(serde_json::json!({ "trip_id": id.to_string() }))
            }
            LedgerError::Trip(TripError::InvalidState { id, status, action }) => {
                Some(serde_json::json!({
                    "trip_id": id.to_string(),
                    "status": status,
                    "action": action,
                }))
            }
            LedgerError::Trip(TripError::DuplicateOrder { order_id }) => {
                Some(serde_json::json!({ "order_id": order_id }))
            }
            LedgerError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }

    /// True when the referenced trip does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::Trip(TripError::NotFound { .. }))
    }

    /// True when a transition was refused because of the trip's current status
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, LedgerError::Trip(TripError::InvalidState { .. }))
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Trip Errors
// =============================================================================

/// Errors raised by the trip lifecycle
#[derive(Debug, Error)]
pub enum TripError {
    #[error("Trip with id '{id}' not found")]
    NotFound { id: Uuid },

    /// The requested transition is not permitted from the current status
    #[error("Cannot {action} trip '{id}' while it is {status}")]
    InvalidState {
        id: Uuid,
        status: TripStatus,
        action: &'static str,
    },

    /// The write lost an optimistic-concurrency race too many times
    #[error("Trip '{id}' was modified concurrently, retry the request")]
    Conflict { id: Uuid },

    #[error("Order '{order_id}' already has a linked trip")]
    DuplicateOrder { order_id: String },
}

impl TripError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TripError::NotFound { .. } => StatusCode::NOT_FOUND,
            TripError::InvalidState { .. } => StatusCode::CONFLICT,
            TripError::Conflict { .. } => StatusCode::CONFLICT,
            TripError::DuplicateOrder { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TripError::NotFound { .. } => "TRIP_NOT_FOUND",
            TripError::InvalidState { .. } => "TRIP_INVALID_STATE",
            TripError::Conflict { .. } => "TRIP_CONFLICT",
            TripError::DuplicateOrder { .. } => "TRIP_DUPLICATE_ORDER",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation failed for field '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation failed: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Shorthand for a single-field failure
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to repository backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to acquire {backend} lock: {message}")]
    LockPoisoned { backend: String, message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration{}: {message}", .file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        LedgerError::Validation(ValidationError::InvalidJson {
            message: rejection.body_text(),
        })
    }
}

impl From<serde_yaml::Error> for LedgerError {
    fn from(err: serde_yaml::Error) -> Self {
        LedgerError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
