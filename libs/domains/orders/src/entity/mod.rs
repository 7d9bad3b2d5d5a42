//! SeaORM entities for the `customer_orders` and `order_items` tables

pub mod order;
pub mod order_item;
