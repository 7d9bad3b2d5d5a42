use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use super::category;
use crate::models::{CreateProduct, Product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub category_id: Option<i64>,
    pub promo: bool,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Join with the row loaded through `find_also_related`
    pub fn into_product(self, category: Option<category::Model>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: category.map(Into::into),
            promo: self.promo,
            active: self.active,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

impl From<CreateProduct> for ActiveModel {
    fn from(input: CreateProduct) -> Self {
        let now = chrono::Utc::now();

        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            category_id: Set(input.category_id),
            promo: Set(input.promo),
            active: Set(input.active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
