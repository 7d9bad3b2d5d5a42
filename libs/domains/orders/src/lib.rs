//! Orders Domain
//!
//! Customer orders: creation with computed totals, and the read-side
//! listings (by product, date range, amount, quantity, status).
//!
//! ```rust,no_run
//! use domain_orders::{handlers, InMemoryOrderRepository, OrderService};
//!
//! let service = OrderService::new(InMemoryOrderRepository::new());
//! let router = axum::Router::new().nest("/orders", handlers::router(service));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    CreateOrder, CreateOrderItem, CustomerOrder, DateRange, NewOrder, OrderItem, OrderQuery,
    OrderSort, OrderStatus,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
