use axum::Router;
use domain_orders::{OrderRepository, OrderService, PgOrderRepository};
use domain_products::{
    CategoryRepository, CategoryService, PgCategoryRepository, PgProductRepository,
    ProductRepository, ProductService,
};

use crate::state::AppState;

pub mod health;

/// Domain routes backed by PostgreSQL, each router with its service state applied.
pub fn routes(state: &AppState) -> Router {
    let products = ProductService::new(
        PgProductRepository::new(state.db.clone()),
        PgCategoryRepository::new(state.db.clone()),
    );
    let categories = CategoryService::new(PgCategoryRepository::new(state.db.clone()));
    let orders = OrderService::new(PgOrderRepository::new(state.db.clone()));

    mount(products, categories, orders)
}

/// Mount points for the three domain routers.
fn mount<P, C, K, O>(
    products: ProductService<P, C>,
    categories: CategoryService<K>,
    orders: OrderService<O>,
) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
    K: CategoryRepository + 'static,
    O: OrderRepository + 'static,
{
    Router::new()
        .nest("/products", domain_products::handlers::products::router(products))
        .nest("/categories", domain_products::handlers::categories::router(categories))
        .nest("/orders", domain_orders::handlers::router(orders))
}

/// `GET /ready`, merged next to the stateless `/health` router.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
