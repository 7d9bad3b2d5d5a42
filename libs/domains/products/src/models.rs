use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Upper bound (exclusive) imposed by the `NUMERIC(12, 2)` price column
const MAX_PRICE: Decimal = Decimal::from_parts(1410065408, 2, 0, false, 0); // 10_000_000_000

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_precision"));
    }
    if *price >= MAX_PRICE {
        return Err(ValidationError::new("price_too_large"));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

/// Product category. Names are unique and stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Decimal serialized as a string, e.g. `"19.99"`
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    /// `null` when the product is uncategorized or its category was removed
    pub category: Option<ProductCategory>,
    pub promo: bool,
    /// `false` once the product has been deactivated
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[schema(value_type = String, example = "19.99")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    /// Must reference an existing category
    #[serde(default)]
    pub category_id: Option<i64>,

    #[serde(default)]
    pub promo: bool,

    #[serde(default = "default_true")]
    pub active: bool,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[schema(value_type = Option<String>, example = "24.50")]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    pub category_id: Option<i64>,

    pub promo: Option<bool>,

    pub active: Option<bool>,
}

impl Product {
    pub fn apply_update(&mut self, update: UpdateProduct, category: Option<ProductCategory>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if update.category_id.is_some() {
            self.category = category;
        }
        if let Some(promo) = update.promo {
            self.promo = promo;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

/// Sort direction accepted by the price listing (`asc` / `desc`, any case)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// Resolved form of `GET /products/price?order=&category=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceListing {
    pub direction: SortDirection,
    /// Lower-cased category filter; `None` lists every product
    pub category: Option<String>,
}

impl PriceListing {
    /// Precedence:
    /// 1. recognized order with a category: that category, in that order
    /// 2. recognized order alone: all products, in that order
    /// 3. anything else (category only, unknown order, nothing): all products ascending
    pub fn resolve(order: Option<&str>, category: Option<&str>) -> Self {
        match (order.and_then(SortDirection::parse), category) {
            (Some(direction), Some(category)) => Self {
                direction,
                category: Some(category.to_lowercase()),
            },
            (Some(direction), None) => Self {
                direction,
                category: None,
            },
            (None, _) => Self {
                direction: SortDirection::Asc,
                category: None,
            },
        }
    }
}

/// Listing order for [`ProductQuery`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    #[default]
    Id,
    /// By price, ties broken by id ascending
    Price(SortDirection),
}

/// Repository-level listing criteria; all filters are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Exact (lower-cased) category name
    pub category: Option<String>,
    pub promo_only: bool,
    /// Case-sensitive substring of the product name
    pub name_contains: Option<String>,
    pub order: ProductOrder,
}

impl From<PriceListing> for ProductQuery {
    fn from(listing: PriceListing) -> Self {
        Self {
            category: listing.category,
            order: ProductOrder::Price(listing.direction),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilterParams {
    /// Category name, matched case-insensitively
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceParams {
    /// `asc` or `desc`; anything else falls back to ascending over all products
    pub order: Option<String>,
    /// Only honored together with a recognized `order`
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameParams {
    pub name: String,
}
