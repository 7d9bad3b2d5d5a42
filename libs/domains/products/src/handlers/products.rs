use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::errors::responses::{
    BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    NotFoundResponse,
};
use axum_helpers::extractors::QueryParams;
use axum_helpers::{IdPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CategoryFilterParams, CreateProduct, NameParams, PriceParams, Product, ProductCategory,
    UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::ProductService;

type SharedService<P, C> = State<Arc<ProductService<P, C>>>;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        list_promotional,
        list_by_category,
        list_by_price,
        search_by_name,
        create_product,
        update_product,
        deactivate_product,
    ),
    components(
        schemas(Product, ProductCategory, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "products", description = "Product catalogue")
    )
)]
pub struct ApiDoc;

pub fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/promo", get(list_promotional))
        .route("/filter", get(list_by_category))
        .route("/price", get(list_by_price))
        .route("/search", get(search_by_name))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .delete(deactivate_product),
        )
        .with_state(shared_service)
}

/// List every product, including deactivated ones
#[utoipa::path(
    get,
    path = "",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.get_by_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/promo",
    tag = "products",
    responses(
        (status = 200, description = "Products on promotion", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_promotional<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.get_promotional().await?))
}

#[utoipa::path(
    get,
    path = "/filter",
    tag = "products",
    params(CategoryFilterParams),
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_category<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    QueryParams(params): QueryParams<CategoryFilterParams>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.get_by_category(&params.category).await?))
}

/// Price-ordered listing.
///
/// `category` only applies together with a recognized `order`; any other
/// combination lists every product ascending.
#[utoipa::path(
    get,
    path = "/price",
    tag = "products",
    params(PriceParams),
    responses(
        (status = 200, description = "Products ordered by price", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_price<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    QueryParams(params): QueryParams<PriceParams>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service
        .get_by_price(params.order.as_deref(), params.category.as_deref())
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "products",
    params(NameParams),
    responses(
        (status = 200, description = "Products whose name contains the fragment", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_by_name<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    QueryParams(params): QueryParams<NameParams>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.search_by_name(&params.name).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "products",
    request_body = CreateProduct,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.create(input).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProduct,
    responses(
        (status = 201, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.update(id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Soft delete; responds with the deactivated product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 201, description = "Product deactivated", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_product<P: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<P, C>,
    IdPath(id): IdPath,
) -> ProductResult<impl IntoResponse> {
    let product = service.deactivate(id).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
