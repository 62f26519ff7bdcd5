//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Tax API                            │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                     │
//! │         │                                                               │
//! │         ├── bad body / query ───────── ValidationError ──┐             │
//! │         ├── CoreError::InvalidInput ───────────────────── ├──► 400      │
//! │         ├── UnsupportedConversion / UnitMismatch ──────── ├──► 422      │
//! │         ├── RuleNotFound ──────────────────────────────── ├──► 422      │
//! │         ├── AmbiguousRule ─────────────────────────────── ├──► 500      │
//! │         └── RulesError (reload) ───────────────────────── └──► 500      │
//! │                                                                         │
//! │  Body: { "code": "UNIT_MISMATCH", "message": "..." }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use ts_rs::TS;

use cess_core::{CoreError, ValidationError};
use cess_rules::RulesError;

/// Error body returned by every endpoint.
///
/// ```json
/// {
///   "code": "RULE_NOT_FOUND",
///   "message": "No cess rule found for HSN 99999999"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Quantity unit cannot be converted (422)
    UnsupportedConversion,

    /// Cess rule unit differs from the quantity's unit (422)
    UnitMismatch,

    /// No rule covers the HSN code (422)
    RuleNotFound,

    /// Rule table resolves ambiguously (500)
    RuleTableMisconfigured,

    /// Rule file could not be loaded (500)
    RuleTableError,

    /// Rule reload is switched off (403)
    ReloadDisabled,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::UnsupportedConversion
            | ErrorCode::UnitMismatch
            | ErrorCode::RuleNotFound => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ReloadDisabled => StatusCode::FORBIDDEN,
            ErrorCode::RuleTableMisconfigured
            | ErrorCode::RuleTableError
            | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Convert CoreError to ApiError.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidInput(_) => ErrorCode::ValidationError,
            CoreError::UnsupportedConversion { .. } => ErrorCode::UnsupportedConversion,
            CoreError::UnitMismatch { .. } => ErrorCode::UnitMismatch,
            CoreError::RuleNotFound { .. } => ErrorCode::RuleNotFound,
            CoreError::AmbiguousRule { .. } => ErrorCode::RuleTableMisconfigured,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Convert RulesError to ApiError.
///
/// The file path and parser position stay in the server log.
impl From<RulesError> for ApiError {
    fn from(err: RulesError) -> Self {
        tracing::error!(error = %err, "Rule table reload failed");
        let message = match &err {
            RulesError::Io { .. } => "Rule file could not be read".to_string(),
            RulesError::Parse(_) => "Rule file is malformed".to_string(),
            RulesError::InvalidRule { .. } => err.to_string(),
        };
        ApiError::new(ErrorCode::RuleTableError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
