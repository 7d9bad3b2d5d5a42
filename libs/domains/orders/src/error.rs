use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order with id {0} not found")]
    NotFound(i64),

    #[error("Unknown order status '{0}'")]
    InvalidStatus(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => AppError::NotFound(err.to_string()),
            OrderError::InvalidStatus(_) => AppError::BadRequest(err.to_string()),
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
