use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use std::collections::HashMap;

use crate::{
    entity::{order, order_item},
    error::{OrderError, OrderResult},
    models::{CustomerOrder, NewOrder, OrderItem, OrderQuery, OrderSort},
    repository::OrderRepository,
};

pub struct PgOrderRepository {
    base: BaseRepository<order::Entity>,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Attach items to each order, keeping the orders' sequence
    async fn with_items<C: ConnectionTrait>(
        db: &C,
        orders: Vec<order::Model>,
    ) -> OrderResult<Vec<CustomerOrder>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let rows = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(ids))
            .order_by_asc(order_item::Column::Id)
            .all(db)
            .await?;

        let mut items: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            items.entry(row.order_id).or_default().push(row.into());
        }

        Ok(orders
            .into_iter()
            .map(|o| {
                let order_items = items.remove(&o.id).unwrap_or_default();
                o.into_order(order_items)
            })
            .collect())
    }
}

/// Item rows referencing a missing product violate `fk_order_items_product_id`
fn map_insert_error(err: DbErr) -> OrderError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            OrderError::Validation("Order references a product that does not exist".to_string())
        }
        _ => OrderError::Database(err),
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, new_order: NewOrder) -> OrderResult<CustomerOrder> {
        let txn = self.base.db().begin().await?;

        let active_model: order::ActiveModel = (&new_order).into();
        let model = active_model.insert(&txn).await?;

        let rows: Vec<order_item::ActiveModel> = new_order
            .items
            .iter()
            .map(|item| order_item::ActiveModel::for_order(model.id, item))
            .collect();
        if !rows.is_empty() {
            order_item::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(map_insert_error)?;
        }

        txn.commit().await?;

        tracing::info!(
            order_id = model.id,
            items = new_order.items.len(),
            "Created order"
        );
        Ok(model.into_order(new_order.items))
    }

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<CustomerOrder>> {
        let Some(model) = self.base.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut orders = Self::with_items(self.base.db(), vec![model]).await?;
        Ok(orders.pop())
    }

    async fn list(&self, query: OrderQuery) -> OrderResult<Vec<CustomerOrder>> {
        let mut select = order::Entity::find();

        if let Some(product_id) = query.product_id {
            select = select.filter(
                order::Column::Id.in_subquery(
                    Query::select()
                        .column(order_item::Column::OrderId)
                        .from(order_item::Entity)
                        .and_where(order_item::Column::ProductId.eq(product_id))
                        .to_owned(),
                ),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(order::Column::Status.eq(status));
        }

        if let Some(range) = query.created_between {
            select = select.filter(order::Column::CreatedAt.between(range.from, range.to));
        }

        select = match query.sort {
            OrderSort::Id => select,
            OrderSort::NewestFirst => select.order_by_desc(order::Column::CreatedAt),
            OrderSort::TotalAmountDesc => select.order_by_desc(order::Column::TotalAmount),
            OrderSort::TotalQuantityDesc => select.order_by_desc(order::Column::TotalQuantity),
        };

        let models = select
            .order_by_asc(order::Column::Id)
            .all(self.base.db())
            .await?;

        Self::with_items(self.base.db(), models).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn order_model(id: i64) -> order::Model {
        order::Model {
            id,
            total_amount: Decimal::new(4000, 2),
            total_quantity: 2,
            status: OrderStatus::Paid,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn item_model(id: i64, order_id: i64, product_id: i64) -> order_item::Model {
        order_item::Model {
            id,
            order_id,
            product_id,
            quantity: 1,
            unit_price: Decimal::new(2000, 2),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_loads_items() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![order_model(4)]])
            .append_query_results([vec![item_model(1, 4, 10), item_model(2, 4, 11)]])
            .into_connection();
        let repo = PgOrderRepository::new(db);

        let order = repo.get_by_id(4).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        let products: Vec<i64> = order.items.iter().map(|i| i.product_id).collect();
        assert_eq!(products, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<order::Model>::new()])
            .into_connection();
        let repo = PgOrderRepository::new(db);

        assert!(repo.get_by_id(4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_groups_items_per_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![order_model(2), order_model(1)]])
            .append_query_results([vec![
                item_model(1, 1, 10),
                item_model(2, 2, 20),
                item_model(3, 2, 21),
            ]])
            .into_connection();
        let repo = PgOrderRepository::new(db);

        let orders = repo
            .list(OrderQuery {
                sort: OrderSort::TotalAmountDesc,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(orders[0].id, 2);
        assert_eq!(orders[0].items.len(), 2);
        assert_eq!(orders[1].items.len(), 1);
    }
}
