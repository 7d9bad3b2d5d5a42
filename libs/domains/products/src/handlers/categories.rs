use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::errors::responses::{
    BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
    InternalServerErrorResponse, NotFoundResponse,
};
use axum_helpers::extractors::QueryParams;
use axum_helpers::{IdPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CreateCategory, NameParams, ProductCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_category_names,
        search_category,
        get_category,
        create_category,
        update_category,
        remove_category,
    ),
    components(
        schemas(ProductCategory, CreateCategory, UpdateCategory),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "categories", description = "Product categories")
    )
)]
pub struct ApiDoc;

pub fn router<C: CategoryRepository + 'static>(service: CategoryService<C>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_category_names).post(create_category))
        .route("/search", get(search_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(remove_category),
        )
        .with_state(shared_service)
}

/// Names of every category
#[utoipa::path(
    get,
    path = "",
    tag = "categories",
    responses(
        (status = 200, description = "Category names", body = Vec<String>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_category_names<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
) -> ProductResult<Json<Vec<String>>> {
    Ok(Json(service.get_category_names().await?))
}

/// First category matching a SQL `LIKE` pattern (`%` and `_` wildcards)
#[utoipa::path(
    get,
    path = "/search",
    tag = "categories",
    params(NameParams),
    responses(
        (status = 200, description = "Matching category", body = ProductCategory),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    QueryParams(params): QueryParams<NameParams>,
) -> ProductResult<Json<ProductCategory>> {
    Ok(Json(service.get_one_by_name(&params.name).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = ProductCategory),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductCategory>> {
    Ok(Json(service.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = ProductCategory),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> ProductResult<impl IntoResponse> {
    let category = service.save(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category renamed", body = ProductCategory),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> ProductResult<Json<ProductCategory>> {
    Ok(Json(service.update(id, input).await?))
}

/// Remove a category; its products stay, uncategorized
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Removed category", body = ProductCategory),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductCategory>> {
    Ok(Json(service.remove_by_id(id).await?))
}
