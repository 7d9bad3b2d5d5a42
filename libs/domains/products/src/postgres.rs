use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionTrait,
};

use crate::{
    entity::{category, product},
    error::{ProductError, ProductResult},
    models::{
        CreateProduct, Product, ProductCategory, ProductOrder, ProductQuery, SortDirection,
        UpdateProduct,
    },
    repository::{CategoryRepository, ProductRepository},
};

/// Backslash-escape `LIKE` metacharacters so `raw` matches literally
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn load_category(&self, model: product::Model) -> ProductResult<Product> {
        let category = match model.category_id {
            Some(id) => category::Entity::find_by_id(id).one(self.base.db()).await?,
            None => None,
        };
        Ok(model.into_product(category))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let active_model: product::ActiveModel = input.into();
        let model = self.base.insert(active_model).await?;

        tracing::info!(product_id = model.id, "Created product");
        self.load_category(model).await
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let row = product::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(self.base.db())
            .await?;

        Ok(row.map(|(model, category)| model.into_product(category)))
    }

    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let mut select = product::Entity::find().find_also_related(category::Entity);

        if let Some(category) = query.category {
            select = select.filter(category::Column::Name.eq(category));
        }

        if query.promo_only {
            select = select.filter(product::Column::Promo.eq(true));
        }

        if let Some(fragment) = query.name_contains {
            let pattern = format!("%{}%", escape_like(&fragment));
            select = select.filter(product::Column::Name.like(pattern));
        }

        select = match query.order {
            ProductOrder::Id => select,
            ProductOrder::Price(SortDirection::Asc) => {
                select.order_by_asc(product::Column::Price)
            }
            ProductOrder::Price(SortDirection::Desc) => {
                select.order_by_desc(product::Column::Price)
            }
        };

        let rows = select
            .order_by_asc(product::Column::Id)
            .all(self.base.db())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, category)| model.into_product(category))
            .collect())
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(ProductError::ProductNotFound(id))?;

        let mut active_model = model.into_active_model();
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if let Some(description) = input.description {
            active_model.description = Set(description);
        }
        if let Some(price) = input.price {
            active_model.price = Set(price);
        }
        if let Some(category_id) = input.category_id {
            active_model.category_id = Set(Some(category_id));
        }
        if let Some(promo) = input.promo {
            active_model.promo = Set(promo);
        }
        if let Some(active) = input.active {
            active_model.active = Set(active);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = self.base.update(active_model).await?;

        tracing::info!(product_id = id, "Updated product");
        self.load_category(updated).await
    }

    async fn set_active(&self, id: i64, active: bool) -> ProductResult<Product> {
        self.update(
            id,
            UpdateProduct {
                active: Some(active),
                ..Default::default()
            },
        )
        .await
    }
}

pub struct PgCategoryRepository {
    base: BaseRepository<category::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

/// Unique index violations on `categories.name` become `DuplicateCategory`
fn map_unique_violation(err: DbErr, name: &str) -> ProductError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ProductError::DuplicateCategory(name.to_string())
        }
        _ => ProductError::Database(err),
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, name: String) -> ProductResult<ProductCategory> {
        let active_model = category::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        };

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| map_unique_violation(e, &name))?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<ProductCategory>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn find_first_by_name_like(
        &self,
        pattern: &str,
    ) -> ProductResult<Option<ProductCategory>> {
        let model = category::Entity::find()
            .filter(category::Column::Name.like(pattern))
            .order_by_asc(category::Column::Id)
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_names(&self) -> ProductResult<Vec<String>> {
        let names = category::Entity::find()
            .select_only()
            .column(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .into_tuple::<String>()
            .all(self.base.db())
            .await?;

        Ok(names)
    }

    async fn rename(&self, id: i64, name: String) -> ProductResult<ProductCategory> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(ProductError::CategoryNotFound(id))?;

        let mut active_model = model.into_active_model();
        active_model.name = Set(name.clone());

        let updated = self
            .base
            .update(active_model)
            .await
            .map_err(|e| map_unique_violation(e, &name))?;

        tracing::info!(category_id = id, "Renamed category");
        Ok(updated.into())
    }

    async fn delete_detaching_products(&self, id: i64) -> ProductResult<u64> {
        let txn = self.base.db().begin().await?;

        if category::Entity::find_by_id(id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Err(ProductError::CategoryNotFound(id));
        }

        let detached = product::Entity::update_many()
            .col_expr(product::Column::CategoryId, Expr::value(None::<i64>))
            .filter(product::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        category::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(category_id = id, detached, "Deleted category");
        Ok(detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn category_model(id: i64, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
        }
    }

    fn product_model(id: i64, category_id: Option<i64>) -> product::Model {
        let now = chrono::Utc::now().into();
        product::Model {
            id,
            name: "Katana".to_string(),
            description: String::new(),
            price: Decimal::new(12000, 2),
            category_id,
            promo: false,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_category_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category_model(3, "swords")]])
            .into_connection();
        let repo = PgCategoryRepository::new(db);

        let category = repo.get_by_id(3).await.unwrap().unwrap();
        assert_eq!(
            category,
            ProductCategory {
                id: 3,
                name: "swords".into()
            }
        );
    }

    #[tokio::test]
    async fn test_rename_missing_category_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let repo = PgCategoryRepository::new(db);

        let err = repo.rename(5, "axes".into()).await.unwrap_err();
        assert!(matches!(err, ProductError::CategoryNotFound(5)));
    }

    #[tokio::test]
    async fn test_create_product_loads_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_model(1, Some(3))]])
            .append_query_results([vec![category_model(3, "swords")]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let created = repo
            .create(CreateProduct {
                name: "Katana".into(),
                description: String::new(),
                price: Decimal::new(12000, 2),
                category_id: Some(3),
                promo: false,
                active: true,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.category_name(), Some("swords"));
    }

    #[tokio::test]
    async fn test_name_search_matches_wildcards_literally() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let found = repo
            .list(ProductQuery {
                name_contains: Some(r"50%_off\".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(found.is_empty());

        let log = db.into_transaction_log();
        let statement = &log[0].statements()[0];
        assert!(statement.sql.contains(r#""products"."name" LIKE"#));

        let values = statement.values.clone().unwrap().0;
        assert!(values.contains(&Value::String(Some(r"%50\%\_off\\%".to_string()))));
    }
}
