//! Extractors that reject with [`AppError`](crate::AppError) JSON bodies
//! instead of axum's plain-text rejections.

pub mod id_path;
pub mod query;
pub mod validated_json;

pub use id_path::IdPath;
pub use query::QueryParams;
pub use validated_json::ValidatedJson;
