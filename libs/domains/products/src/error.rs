use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with id {0} not found")]
    ProductNotFound(i64),

    #[error("Category with id {0} not found")]
    CategoryNotFound(i64),

    #[error("Category with name '{0}' not found")]
    CategoryNameNotFound(String),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::ProductNotFound(_)
            | ProductError::CategoryNotFound(_)
            | ProductError::CategoryNameNotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::DuplicateCategory(_) => AppError::Conflict(err.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
