use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Eshop API",
        version = "0.1.0",
        description = "Products, categories and customer orders"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/products", api = domain_products::handlers::products::ApiDoc),
        (path = "/categories", api = domain_products::handlers::categories::ApiDoc),
        (path = "/orders", api = domain_orders::handlers::ApiDoc)
    ),
    tags(
        (name = "products", description = "Product catalogue"),
        (name = "categories", description = "Product categories"),
        (name = "orders", description = "Customer orders")
    )
)]
pub struct ApiDoc;
