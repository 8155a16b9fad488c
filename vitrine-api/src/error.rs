//! Error Types for the Vitrine origin
//!
//! Maps pipeline failures onto HTTP status codes. Response bodies are short
//! generic plain text; details only ever go to the log.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;
use vitrine_core::VitrineError;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Categories of serving failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request path cannot name an asset
    InvalidPath,

    /// The asset does not exist
    AssetNotFound,

    /// Only GET, HEAD and OPTIONS are served
    MethodNotAllowed,

    /// The backing store did not answer
    StoreUnavailable,

    /// The request overran its deadline
    Timeout,

    /// Configuration could not be loaded
    InvalidConfig,

    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidPath => StatusCode::BAD_REQUEST,
            ErrorCode::AssetNotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            // Overruns are served through the 500 fallback, not as a 504.
            ErrorCode::Timeout | ErrorCode::InvalidConfig | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPath => "Invalid request path",
            ErrorCode::AssetNotFound => "Asset not found",
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::StoreUnavailable => "Backing store unavailable",
            ErrorCode::Timeout => "Request timed out",
            ErrorCode::InvalidConfig => "Invalid configuration",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// SERVE ERROR STRUCT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeError {
    pub code: ErrorCode,
    /// Detail for logs; never sent to the client.
    pub message: String,
}

impl ServeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn method_not_allowed() -> Self {
        Self::from_code(ErrorCode::MethodNotAllowed)
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// True when the failure must go through the fallback chain rather than
    /// straight to the client.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(
            self.code,
            ErrorCode::InvalidPath | ErrorCode::MethodNotAllowed
        )
    }

    /// Status the fallback chain is entered with.
    pub fn fallback_status(&self) -> StatusCode {
        match self.code {
            ErrorCode::AssetNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ServeError {}

/// Generic plain-text body for a status: `"Not Found"`, `"Bad Request"`, ...
pub fn generic_body(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            generic_body(status),
        )
            .into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<VitrineError> for ServeError {
    fn from(err: VitrineError) -> Self {
        let code = match &err {
            VitrineError::ClientInput { .. } => ErrorCode::InvalidPath,
            VitrineError::NotFound { .. } => ErrorCode::AssetNotFound,
            VitrineError::Timeout { .. } => ErrorCode::Timeout,
            VitrineError::Storage(_) | VitrineError::Decode { .. } => ErrorCode::InternalError,
        };
        Self::new(code, err.to_string())
    }
}

/// Result type alias for serving operations.
pub type ServeResult<T> = Result<T, ServeError>;
