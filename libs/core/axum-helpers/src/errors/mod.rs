pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1006,
///   "error": "CONFLICT",
///   "message": "Category 'swords' already exists"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable message, naming the offending id or value when there is one
    pub message: String,
    /// Field-level validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Error type returned by handlers; converts into a JSON [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Path extraction error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorResponse) {
        match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidJson.code(), "JSON rejection: {}", e);
                (e.status(), ErrorResponse::new(ErrorCode::InvalidJson, e.body_text()))
            }
            AppError::QueryRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidQuery.code(), "Query rejection: {}", e);
                (e.status(), ErrorResponse::new(ErrorCode::InvalidQuery, e.body_text()))
            }
            AppError::PathRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidId.code(), "Path rejection: {}", e);
                (e.status(), ErrorResponse::new(ErrorCode::InvalidId, e.body_text()))
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {}", e);
                let mut body = ErrorResponse::new(
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message(),
                );
                body.details = serde_json::to_value(&e).ok();
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::InvalidId(raw) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), id = %raw, "Invalid id");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::InvalidId, format!("Invalid id: {}", raw)),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(ErrorCode::ValidationError, msg))
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new(ErrorCode::NotFound, msg))
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new(ErrorCode::Conflict, msg))
            }
            AppError::Database(e) => map_db_error(&e),
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError, ErrorCode::InternalError.default_message()),
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = ErrorCode::ServiceUnavailable.code(), "Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, ErrorResponse::new(ErrorCode::ServiceUnavailable, msg))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

/// Database failures never leak driver details to the client.
fn map_db_error(error: &DbErr) -> (StatusCode, ErrorResponse) {
    match error {
        DbErr::RecordNotFound(what) => {
            tracing::info!(error_code = ErrorCode::NotFound.code(), "Record not found: {}", what);
            (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotFound, ErrorCode::NotFound.default_message()),
            )
        }
        DbErr::ConnectionAcquire(e) => {
            tracing::error!(error_code = ErrorCode::DatabaseUnavailable.code(), "Connection acquire failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(
                    ErrorCode::DatabaseUnavailable,
                    ErrorCode::DatabaseUnavailable.default_message(),
                ),
            )
        }
        _ => {
            tracing::error!(error_code = ErrorCode::DatabaseError.code(), "Database error: {:?}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(ErrorCode::DatabaseError, ErrorCode::DatabaseError.default_message()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn test_not_found_maps_to_404_with_message() {
        let (status, body) = AppError::NotFound("Product with id 7 not found".into()).status_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "Product with id 7 not found");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let (status, body) = AppError::Conflict("Category 'axes' already exists".into()).status_and_body();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, 1006);
    }

    #[test]
    fn test_validation_error_carries_field_details() {
        let errors = Named { name: String::new() }.validate().unwrap_err();
        let (status, body) = AppError::from(errors).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = body.details.unwrap();
        assert!(details.get("name").is_some());
    }

    #[test]
    fn test_database_error_hides_driver_message() {
        let err = DbErr::Custom("relation \"products\" does not exist".into());
        let (status, body) = AppError::from(err).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Database error occurred");
    }

    #[test]
    fn test_invalid_id_message_names_raw_value() {
        let (status, body) = AppError::InvalidId("abc".into()).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Invalid id: abc");
    }
}
