//! Products Domain
//!
//! Product catalogue and product categories.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Handlers     │  ← /products and /categories endpoints
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │    Services     │  ← validation, price dispatch, category cascade
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │  Repositories   │  ← PostgreSQL or in-memory
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │     Models      │  ← entities, DTOs, query types
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers, CategoryService, InMemoryCatalogRepository, ProductService,
//! };
//!
//! let catalog = InMemoryCatalogRepository::new();
//! let products = ProductService::new(catalog.clone(), catalog.clone());
//! let categories = CategoryService::new(catalog);
//!
//! let router = axum::Router::new()
//!     .nest("/products", handlers::products::router(products))
//!     .nest("/categories", handlers::categories::router(categories));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{
    CreateCategory, CreateProduct, PriceListing, Product, ProductCategory, ProductOrder,
    ProductQuery, SortDirection, UpdateCategory, UpdateProduct,
};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{CategoryRepository, InMemoryCatalogRepository, ProductRepository};
pub use service::{CategoryService, ProductService};
