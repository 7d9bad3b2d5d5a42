use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, PriceListing, Product, ProductQuery, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};

/// Service layer for product business logic
#[derive(Clone)]
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    async fn ensure_category_exists(&self, category_id: Option<i64>) -> ProductResult<()> {
        if let Some(id) = category_id {
            if self.categories.get_by_id(id).await?.is_none() {
                return Err(ProductError::CategoryNotFound(id));
            }
        }
        Ok(())
    }

    /// Every product, active or not, by id
    pub async fn get_all(&self) -> ProductResult<Vec<Product>> {
        self.products.list(ProductQuery::default()).await
    }

    #[instrument(skip(self), fields(product_id = id))]
    pub async fn get_by_id(&self, id: i64) -> ProductResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(ProductError::ProductNotFound(id))
    }

    pub async fn get_promotional(&self) -> ProductResult<Vec<Product>> {
        self.products
            .list(ProductQuery {
                promo_only: true,
                ..Default::default()
            })
            .await
    }

    /// Products in the named category; the name is lower-cased before lookup
    #[instrument(skip(self))]
    pub async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.products
            .list(ProductQuery {
                category: Some(category.to_lowercase()),
                ..Default::default()
            })
            .await
    }

    /// Price-ordered listing; see [`PriceListing::resolve`] for how `order`
    /// and `category` combine
    #[instrument(skip(self))]
    pub async fn get_by_price(
        &self,
        order: Option<&str>,
        category: Option<&str>,
    ) -> ProductResult<Vec<Product>> {
        let listing = PriceListing::resolve(order, category);
        tracing::debug!(?listing, "Resolved price listing");
        self.products.list(listing.into()).await
    }

    /// Case-sensitive substring match on the product name
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, fragment: &str) -> ProductResult<Vec<Product>> {
        self.products
            .list(ProductQuery {
                name_contains: Some(fragment.to_string()),
                ..Default::default()
            })
            .await
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        self.ensure_category_exists(input.category_id).await?;

        self.products.create(input).await
    }

    #[instrument(skip(self, input), fields(product_id = id))]
    pub async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        self.ensure_category_exists(input.category_id).await?;

        self.products.update(id, input).await
    }

    /// Soft delete: the row stays, with `active = false`
    #[instrument(skip(self), fields(product_id = id))]
    pub async fn deactivate(&self, id: i64) -> ProductResult<Product> {
        self.products.set_active(id, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductOrder, SortDirection};
    use crate::repository::{
        InMemoryCatalogRepository, MockCategoryRepository, MockProductRepository,
    };
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn katana(category_id: Option<i64>) -> CreateProduct {
        CreateProduct {
            name: "Katana".into(),
            description: String::new(),
            price: Decimal::new(12000, 2),
            category_id,
            promo: false,
            active: true,
        }
    }

    fn catalog() -> (
        ProductService<InMemoryCatalogRepository, InMemoryCatalogRepository>,
        InMemoryCatalogRepository,
    ) {
        let repo = InMemoryCatalogRepository::new();
        (ProductService::new(repo.clone(), repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_price_listing_without_recognized_order_lists_everything_ascending() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(ProductQuery {
                order: ProductOrder::Price(SortDirection::Asc),
                ..Default::default()
            }))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(products, MockCategoryRepository::new());
        service
            .get_by_price(Some("bogus"), Some("swords"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_price_listing_desc_with_category_filters() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(ProductQuery {
                category: Some("swords".into()),
                order: ProductOrder::Price(SortDirection::Desc),
                ..Default::default()
            }))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(products, MockCategoryRepository::new());
        service
            .get_by_price(Some("Desc"), Some("SWORDS"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_by_category_lower_cases() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .withf(|query| query.category.as_deref() == Some("swords"))
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(products, MockCategoryRepository::new());
        service.get_by_category("Swords").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_fails() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_get_by_id()
            .with(eq(9))
            .returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products.expect_create().never();

        let service = ProductService::new(products, categories);
        let err = service.create(katana(Some(9))).await.unwrap_err();
        assert!(matches!(err, ProductError::CategoryNotFound(9)));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let (service, _) = catalog();
        let mut input = katana(None);
        input.price = Decimal::new(-1, 0);

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let (service, _) = catalog();
        let err = service.get_by_id(77).await.unwrap_err();
        assert_eq!(err.to_string(), "Product with id 77 not found");
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let (service, _) = catalog();
        let created = service.create(katana(None)).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateProduct {
                    price: Some(Decimal::new(9950, 2)),
                    promo: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Katana");
        assert_eq!(updated.price, Decimal::new(9950, 2));
        assert!(updated.promo);
        assert!(updated.active);
    }

    #[tokio::test]
    async fn test_deactivate_keeps_product_listed() {
        let (service, _) = catalog();
        let created = service.create(katana(None)).await.unwrap();

        let deactivated = service.deactivate(created.id).await.unwrap();
        assert!(!deactivated.active);

        let all = service.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].active);
    }

    #[tokio::test]
    async fn test_deactivate_missing_product() {
        let (service, _) = catalog();
        let err = service.deactivate(4).await.unwrap_err();
        assert!(matches!(err, ProductError::ProductNotFound(4)));
    }

    #[tokio::test]
    async fn test_search_by_name_is_case_sensitive() {
        let (service, _) = catalog();
        service.create(katana(None)).await.unwrap();

        assert_eq!(service.search_by_name("tan").await.unwrap().len(), 1);
        assert!(service.search_by_name("KAT").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_promotional_listing() {
        let (service, _) = catalog();
        service.create(katana(None)).await.unwrap();
        let mut promo = katana(None);
        promo.name = "Wakizashi".into();
        promo.promo = true;
        service.create(promo).await.unwrap();

        let listed = service.get_promotional().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Wakizashi");
    }
}
