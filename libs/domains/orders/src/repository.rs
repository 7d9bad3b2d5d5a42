use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::OrderResult;
use crate::models::{CustomerOrder, NewOrder, OrderQuery, OrderSort};

/// Repository trait for CustomerOrder persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order and its items
    async fn create(&self, order: NewOrder) -> OrderResult<CustomerOrder>;

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<CustomerOrder>>;

    /// List orders, items included, matching every criterion of `query`
    async fn list(&self, query: OrderQuery) -> OrderResult<Vec<CustomerOrder>>;
}

#[derive(Debug, Default)]
struct OrderState {
    orders: BTreeMap<i64, CustomerOrder>,
    next_id: i64,
}

/// In-memory implementation of OrderRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<OrderState>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with a fixed `created_at`, for date-range tests
    pub async fn insert_at(
        &self,
        order: NewOrder,
        created_at: chrono::DateTime<Utc>,
    ) -> CustomerOrder {
        let mut state = self.state.write().await;
        state.next_id += 1;

        let stored = CustomerOrder {
            id: state.next_id,
            items: order.items,
            total_amount: order.total_amount,
            total_quantity: order.total_quantity,
            status: order.status,
            created_at,
        };
        state.orders.insert(stored.id, stored.clone());
        stored
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> OrderResult<CustomerOrder> {
        let created = self.insert_at(order, Utc::now()).await;

        tracing::info!(order_id = created.id, "Created order");
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<CustomerOrder>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).cloned())
    }

    async fn list(&self, query: OrderQuery) -> OrderResult<Vec<CustomerOrder>> {
        let state = self.state.read().await;

        let mut result: Vec<CustomerOrder> = state
            .orders
            .values()
            .filter(|o| {
                if let Some(product_id) = query.product_id {
                    if !o.items.iter().any(|i| i.product_id == product_id) {
                        return false;
                    }
                }

                if let Some(status) = query.status {
                    if o.status != status {
                        return false;
                    }
                }

                if let Some(range) = query.created_between {
                    if o.created_at < range.from || o.created_at > range.to {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        // Values come out id-ascending; stable sorts keep that for ties
        match query.sort {
            OrderSort::Id => {}
            OrderSort::NewestFirst => result.sort_by_key(|o| Reverse(o.created_at)),
            OrderSort::TotalAmountDesc => result.sort_by_key(|o| Reverse(o.total_amount)),
            OrderSort::TotalQuantityDesc => result.sort_by_key(|o| Reverse(o.total_quantity)),
        }

        Ok(result)
    }
}
