//! PostgreSQL integration tests for the orders domain
//!
//! Run with `cargo test -p domain_orders -- --ignored` when Docker is available.

use domain_orders::*;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use test_utils::TestDatabase;
use test_utils::assertions::assert_ids_in_order;

/// Products referenced by order items must exist
async fn seed_products(db: &TestDatabase, count: i64) {
    for n in 1..=count {
        db.connection
            .execute_unprepared(&format!(
                "INSERT INTO products (name, price) VALUES ('product-{n}', {n}.00)"
            ))
            .await
            .expect("Failed to seed product");
    }
}

fn item(product_id: i64, quantity: i32, cents: i64) -> CreateOrderItem {
    CreateOrderItem {
        product_id,
        quantity,
        unit_price: Decimal::new(cents, 2),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_read_back_with_items() {
    let db = TestDatabase::new().await;
    seed_products(&db, 2).await;
    let service = OrderService::new(PgOrderRepository::new(db.connection()));

    let created = service
        .create(CreateOrder {
            items: vec![item(1, 2, 1999), item(2, 1, 500)],
            status: None,
        })
        .await
        .unwrap();

    let fetched = service.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.items, created.items);
    assert_eq!(fetched.total_amount, Decimal::new(4498, 2));
    assert_eq!(fetched.status, OrderStatus::Pending);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unknown_product_is_validation_error() {
    let db = TestDatabase::new().await;
    let service = OrderService::new(PgOrderRepository::new(db.connection()));

    let err = service
        .create(CreateOrder {
            items: vec![item(404, 1, 100)],
            status: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Validation(_)));
    assert!(service.get_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_status_and_product_queries() {
    let db = TestDatabase::new().await;
    seed_products(&db, 3).await;
    let service = OrderService::new(PgOrderRepository::new(db.connection()));

    let shipped = service
        .create(CreateOrder {
            items: vec![item(1, 1, 100), item(3, 1, 100)],
            status: Some(OrderStatus::Shipped),
        })
        .await
        .unwrap();
    let pending = service
        .create(CreateOrder {
            items: vec![item(2, 5, 100), item(3, 1, 100)],
            status: None,
        })
        .await
        .unwrap();

    let by_status = service.get_all_by_status("shipped").await.unwrap();
    assert_ids_in_order(by_status.iter().map(|o| o.id), &[shipped.id], "status");

    let with_3 = service.get_all_containing_product(3).await.unwrap();
    assert_ids_in_order(with_3.iter().map(|o| o.id), &[shipped.id, pending.id], "product 3");
    assert_eq!(with_3[0].items.len(), 2);

    let by_quantity = service.get_all_by_quantity_desc().await.unwrap();
    assert_ids_in_order(
        by_quantity.iter().map(|o| o.id),
        &[pending.id, shipped.id],
        "quantity",
    );
}
