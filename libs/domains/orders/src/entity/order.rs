use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{CustomerOrder, NewOrder, OrderItem, OrderStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_amount: Decimal,
    pub total_quantity: i32,
    pub status: OrderStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_order(self, items: Vec<OrderItem>) -> CustomerOrder {
        CustomerOrder {
            id: self.id,
            items,
            total_amount: self.total_amount,
            total_quantity: self.total_quantity,
            status: self.status,
            created_at: self.created_at.into(),
        }
    }
}

impl From<&NewOrder> for ActiveModel {
    fn from(order: &NewOrder) -> Self {
        ActiveModel {
            id: NotSet,
            total_amount: Set(order.total_amount),
            total_quantity: Set(order.total_quantity),
            status: Set(order.status),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
