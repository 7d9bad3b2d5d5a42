use axum::{
    Json, Router,
    extract::{Path, State},
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

use crate::error::OrderResult;
use crate::models::{
    CreateOrder, CreateOrderItem, CustomerOrder, DateRange, OrderItem, OrderStatus,
    ProductIdParams,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

/// OpenAPI documentation for the Orders API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_orders,
        get_order,
        list_containing_product,
        list_newest,
        list_between_dates,
        list_by_amount,
        list_by_quantity,
        list_by_status,
        create_order,
    ),
    components(
        schemas(CustomerOrder, OrderItem, OrderStatus, CreateOrder, CreateOrderItem, DateRange),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "orders", description = "Customer orders")
    )
)]
pub struct ApiDoc;

/// Create the order router with all HTTP endpoints
pub fn router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/product", get(list_containing_product))
        .route("/newest", get(list_newest))
        .route("/date", get(list_between_dates))
        .route("/byAmount", get(list_by_amount))
        .route("/byQuantity", get(list_by_quantity))
        .route("/status/{status}", get(list_by_status))
        .route("/{id}", get(get_order))
        .with_state(shared_service)
}

#[utoipa::path(
    get,
    path = "",
    tag = "orders",
    responses(
        (status = 200, description = "All orders by id", body = Vec<CustomerOrder>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = CustomerOrder),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
) -> OrderResult<Json<CustomerOrder>> {
    Ok(Json(service.get_by_id(id).await?))
}

/// Orders that include the given product
#[utoipa::path(
    get,
    path = "/product",
    tag = "orders",
    params(ProductIdParams),
    responses(
        (status = 200, description = "Orders containing the product", body = Vec<CustomerOrder>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_containing_product<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    QueryParams(params): QueryParams<ProductIdParams>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all_containing_product(params.id).await?))
}

#[utoipa::path(
    get,
    path = "/newest",
    tag = "orders",
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<CustomerOrder>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_newest<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all_newest().await?))
}

/// Orders created between `from` and `to`, inclusive. The range travels in
/// the request body.
#[utoipa::path(
    get,
    path = "/date",
    tag = "orders",
    request_body = DateRange,
    responses(
        (status = 200, description = "Orders in the range", body = Vec<CustomerOrder>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_between_dates<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    ValidatedJson(range): ValidatedJson<DateRange>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all_between(range).await?))
}

#[utoipa::path(
    get,
    path = "/byAmount",
    tag = "orders",
    responses(
        (status = 200, description = "Orders by total amount, descending", body = Vec<CustomerOrder>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_amount<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all_by_amount_desc().await?))
}

#[utoipa::path(
    get,
    path = "/byQuantity",
    tag = "orders",
    responses(
        (status = 200, description = "Orders by total quantity, descending", body = Vec<CustomerOrder>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_quantity<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all_by_quantity_desc().await?))
}

/// Orders in a status; the path value is matched case-insensitively
#[utoipa::path(
    get,
    path = "/status/{status}",
    tag = "orders",
    params(("status" = String, Path, description = "Order status, e.g. `shipped`")),
    responses(
        (status = 200, description = "Orders in the status", body = Vec<CustomerOrder>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_status<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Path(status): Path<String>,
) -> OrderResult<Json<Vec<CustomerOrder>>> {
    Ok(Json(service.get_all_by_status(&status).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = CustomerOrder),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
