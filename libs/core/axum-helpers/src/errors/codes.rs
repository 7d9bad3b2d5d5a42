//! Error codes carried in every error response.
//!
//! Each code has a client-facing identifier (e.g. `"NOT_FOUND"`), an integer
//! used in logs and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Conflict;
//! assert_eq!(code.as_str(), "CONFLICT");
//! assert_eq!(code.code(), 1006);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body or query failed validation
    ValidationError,

    /// Path id is not a valid integer
    InvalidId,

    /// Request body is not valid JSON for the target type
    InvalidJson,

    /// Query string could not be decoded
    InvalidQuery,

    NotFound,

    /// Request conflicts with existing state (duplicate category name)
    Conflict,

    // Server errors (1100-1199)
    InternalError,

    ServiceUnavailable,

    // Database errors (2000-2999)
    DatabaseError,

    /// Connection pool exhausted or closed
    DatabaseUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1099: client errors
    /// - 1100-1199: server errors
    /// - 2000-2999: database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::InvalidQuery => 1004,
            Self::NotFound => 1005,
            Self::Conflict => 1006,
            Self::InternalError => 1101,
            Self::ServiceUnavailable => 1102,
            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid id format",
            Self::InvalidJson => "Invalid JSON body",
            Self::InvalidQuery => "Invalid query parameters",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
