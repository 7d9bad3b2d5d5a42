use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrder, CustomerOrder, DateRange, NewOrder, OrderQuery, OrderSort, OrderStatus,
};
use crate::repository::OrderRepository;

/// Service layer for order business logic
#[derive(Clone)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn list_sorted(&self, sort: OrderSort) -> OrderResult<Vec<CustomerOrder>> {
        self.repository
            .list(OrderQuery {
                sort,
                ..Default::default()
            })
            .await
    }

    pub async fn get_all(&self) -> OrderResult<Vec<CustomerOrder>> {
        self.list_sorted(OrderSort::Id).await
    }

    #[instrument(skip(self), fields(order_id = id))]
    pub async fn get_by_id(&self, id: i64) -> OrderResult<CustomerOrder> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    /// Orders with at least one item for `product_id`
    #[instrument(skip(self))]
    pub async fn get_all_containing_product(
        &self,
        product_id: i64,
    ) -> OrderResult<Vec<CustomerOrder>> {
        self.repository
            .list(OrderQuery {
                product_id: Some(product_id),
                ..Default::default()
            })
            .await
    }

    pub async fn get_all_newest(&self) -> OrderResult<Vec<CustomerOrder>> {
        self.list_sorted(OrderSort::NewestFirst).await
    }

    /// Orders created within `range`, both ends inclusive
    #[instrument(skip(self))]
    pub async fn get_all_between(&self, range: DateRange) -> OrderResult<Vec<CustomerOrder>> {
        range
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        self.repository
            .list(OrderQuery {
                created_between: Some(range),
                ..Default::default()
            })
            .await
    }

    pub async fn get_all_by_amount_desc(&self) -> OrderResult<Vec<CustomerOrder>> {
        self.list_sorted(OrderSort::TotalAmountDesc).await
    }

    pub async fn get_all_by_quantity_desc(&self) -> OrderResult<Vec<CustomerOrder>> {
        self.list_sorted(OrderSort::TotalQuantityDesc).await
    }

    /// `raw` is upper-cased before parsing, so `shipped` selects `SHIPPED`
    #[instrument(skip(self))]
    pub async fn get_all_by_status(&self, raw: &str) -> OrderResult<Vec<CustomerOrder>> {
        let status = OrderStatus::try_from(raw.to_uppercase().as_str())
            .map_err(|_| OrderError::InvalidStatus(raw.to_string()))?;

        self.repository
            .list(OrderQuery {
                status: Some(status),
                ..Default::default()
            })
            .await
    }

    /// Validate, compute totals and persist; status defaults to `PENDING`
    #[instrument(skip(self, input), fields(items = input.items.len()))]
    pub async fn create(&self, input: CreateOrder) -> OrderResult<CustomerOrder> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let order = NewOrder::from_input(input)
            .ok_or_else(|| OrderError::Validation("Order totals are too large".to_string()))?;

        self.repository.create(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateOrderItem;
    use crate::repository::{InMemoryOrderRepository, MockOrderRepository};
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn item(product_id: i64, quantity: i32, cents: i64) -> CreateOrderItem {
        CreateOrderItem {
            product_id,
            quantity,
            unit_price: Decimal::new(cents, 2),
        }
    }

    #[tokio::test]
    async fn test_status_is_upper_cased_before_lookup() {
        let mut mock = MockOrderRepository::new();
        mock.expect_list()
            .with(eq(OrderQuery {
                status: Some(OrderStatus::Shipped),
                ..Default::default()
            }))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = OrderService::new(mock);
        service.get_all_by_status("shipped").await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let mut mock = MockOrderRepository::new();
        mock.expect_list().never();

        let service = OrderService::new(mock);
        let err = service.get_all_by_status("lost").await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidStatus(s) if s == "lost"));
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let mut mock = MockOrderRepository::new();
        mock.expect_get_by_id().with(eq(3)).returning(|_| Ok(None));

        let service = OrderService::new(mock);
        let err = service.get_by_id(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Order with id 3 not found");
    }

    #[tokio::test]
    async fn test_create_computes_totals_and_defaults_status() {
        let mut mock = MockOrderRepository::new();
        mock.expect_create()
            .withf(|order| {
                order.total_quantity == 3
                    && order.total_amount == Decimal::new(4498, 2)
                    && order.status == OrderStatus::Pending
            })
            .times(1)
            .returning(|order| {
                Ok(CustomerOrder {
                    id: 1,
                    items: order.items,
                    total_amount: order.total_amount,
                    total_quantity: order.total_quantity,
                    status: order.status,
                    created_at: Utc::now(),
                })
            });

        let service = OrderService::new(mock);
        let created = service
            .create(CreateOrder {
                items: vec![item(1, 2, 1999), item(2, 1, 500)],
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(created.total_quantity, 3);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_order() {
        let mut mock = MockOrderRepository::new();
        mock.expect_create().never();

        let service = OrderService::new(mock);
        let err = service
            .create(CreateOrder {
                items: vec![],
                status: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_date_range_must_be_ordered() {
        let service = OrderService::new(InMemoryOrderRepository::new());
        let now = Utc::now();

        let err = service
            .get_all_between(DateRange {
                from: now,
                to: now - Duration::minutes(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_listings_over_in_memory_store() {
        let service = OrderService::new(InMemoryOrderRepository::new());

        let small = service
            .create(CreateOrder {
                items: vec![item(1, 1, 100)],
                status: Some(OrderStatus::Paid),
            })
            .await
            .unwrap();
        let large = service
            .create(CreateOrder {
                items: vec![item(2, 4, 2500), item(1, 1, 100)],
                status: None,
            })
            .await
            .unwrap();

        let by_amount = service.get_all_by_amount_desc().await.unwrap();
        assert_eq!(by_amount[0].id, large.id);

        let with_product_2 = service.get_all_containing_product(2).await.unwrap();
        assert_eq!(with_product_2.len(), 1);
        assert_eq!(with_product_2[0].id, large.id);

        let paid = service.get_all_by_status("Paid").await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, small.id);

        let range = DateRange {
            from: small.created_at,
            to: large.created_at,
        };
        assert_eq!(service.get_all_between(range).await.unwrap().len(), 2);
    }
}
