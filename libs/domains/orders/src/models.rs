use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Order lifecycle status, stored as the `order_status` PostgreSQL enum
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Default for new orders
    #[default]
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "SHIPPED")]
    Shipped,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i32,
    #[schema(value_type = String, example = "19.99")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerOrder {
    pub id: i64,
    pub items: Vec<OrderItem>,
    /// Σ quantity × unit_price
    #[schema(value_type = String, example = "59.97")]
    pub total_amount: Decimal,
    /// Σ quantity
    pub total_quantity: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_precision"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItem {
    #[validate(range(min = 1))]
    pub product_id: i64,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[schema(value_type = String, example = "19.99")]
    #[validate(custom(function = "validate_unit_price"))]
    pub unit_price: Decimal,
}

/// Order as submitted by the client; totals are computed server-side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItem>,

    /// Defaults to `PENDING`
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// Validated order with totals, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub total_quantity: i32,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Largest total `NUMERIC(14, 2)` can hold
    fn max_total_amount() -> Decimal {
        Decimal::new(99_999_999_999_999, 2)
    }

    /// Compute totals; `None` when they overflow their columns
    pub fn from_input(input: CreateOrder) -> Option<Self> {
        let mut total_amount = Decimal::ZERO;
        let mut total_quantity: i32 = 0;

        for item in &input.items {
            total_quantity = total_quantity.checked_add(item.quantity)?;
            let line = Decimal::from(item.quantity).checked_mul(item.unit_price)?;
            total_amount = total_amount.checked_add(line)?;
        }

        if total_amount > Self::max_total_amount() {
            return None;
        }

        Some(Self {
            items: input
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
            total_amount,
            total_quantity,
            status: input.status.unwrap_or_default(),
        })
    }
}

fn validate_date_range(range: &DateRange) -> Result<(), ValidationError> {
    if range.from > range.to {
        return Err(ValidationError::new("from_after_to"));
    }
    Ok(())
}

/// Inclusive `created_at` range, sent as a JSON body on `GET /orders/date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_date_range"))]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Listing order; ties always break by id ascending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    #[default]
    Id,
    NewestFirst,
    TotalAmountDesc,
    TotalQuantityDesc,
}

/// Repository-level listing criteria; all filters are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Orders with at least one item for this product
    pub product_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub created_between: Option<DateRange>,
    pub sort: OrderSort,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductIdParams {
    /// Product id
    pub id: i64,
}
