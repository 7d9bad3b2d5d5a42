//! HTTP handlers for `/products` and `/categories`

pub mod categories;
pub mod products;
