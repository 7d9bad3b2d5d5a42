use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, Product, ProductCategory, ProductOrder, ProductQuery, SortDirection,
    UpdateProduct,
};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; `category_id` is assumed to exist
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// List products matching every criterion of `query`
    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;

    /// Apply the present fields of `input`; `ProductNotFound` if absent
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product>;

    /// Flip the `active` flag; `ProductNotFound` if absent
    async fn set_active(&self, id: i64, active: bool) -> ProductResult<Product>;
}

/// Repository trait for ProductCategory persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category; the name is stored as given
    async fn create(&self, name: String) -> ProductResult<ProductCategory>;

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<ProductCategory>>;

    /// Lowest-id category whose name matches a SQL `LIKE` pattern
    async fn find_first_by_name_like(&self, pattern: &str)
    -> ProductResult<Option<ProductCategory>>;

    /// Every category name, by id
    async fn list_names(&self) -> ProductResult<Vec<String>>;

    /// `CategoryNotFound` if absent
    async fn rename(&self, id: i64, name: String) -> ProductResult<ProductCategory>;

    /// Clear the category of every product referencing it, then delete it.
    ///
    /// Both steps succeed or neither does. Returns the number of detached products.
    async fn delete_detaching_products(&self, id: i64) -> ProductResult<u64>;
}

#[derive(Debug, Clone)]
struct StoredProduct {
    product: Product,
    category_id: Option<i64>,
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<i64, ProductCategory>,
    products: BTreeMap<i64, StoredProduct>,
    next_category_id: i64,
    next_product_id: i64,
}

impl CatalogState {
    /// Products carry a snapshot of their category; resolve it on every read
    fn materialize(&self, stored: &StoredProduct) -> Product {
        let mut product = stored.product.clone();
        product.category = stored
            .category_id
            .and_then(|id| self.categories.get(&id).cloned());
        product
    }

    fn product(&self, id: i64) -> ProductResult<Product> {
        self.products
            .get(&id)
            .map(|stored| self.materialize(stored))
            .ok_or(ProductError::ProductNotFound(id))
    }
}

/// In-memory catalogue implementing both [`ProductRepository`] and
/// [`CategoryRepository`] over one shared state (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut state = self.state.write().await;

        if let Some(category_id) = input.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(ProductError::CategoryNotFound(category_id));
            }
        }

        state.next_product_id += 1;
        let id = state.next_product_id;
        let now = Utc::now();

        let stored = StoredProduct {
            product: Product {
                id,
                name: input.name,
                description: input.description,
                price: input.price,
                category: None,
                promo: input.promo,
                active: input.active,
                created_at: now,
                updated_at: now,
            },
            category_id: input.category_id,
        };
        state.products.insert(id, stored);

        tracing::info!(product_id = id, "Created product");
        state.product(id)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).map(|stored| state.materialize(stored)))
    }

    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let state = self.state.read().await;

        let mut result: Vec<Product> = state
            .products
            .values()
            .map(|stored| state.materialize(stored))
            .filter(|p| {
                if let Some(category) = &query.category {
                    if p.category_name() != Some(category.as_str()) {
                        return false;
                    }
                }

                if query.promo_only && !p.promo {
                    return false;
                }

                if let Some(fragment) = &query.name_contains {
                    if !p.name.contains(fragment.as_str()) {
                        return false;
                    }
                }

                true
            })
            .collect();

        // BTreeMap iteration is already id-ascending; stable sort keeps it for ties
        match query.order {
            ProductOrder::Id => {}
            ProductOrder::Price(SortDirection::Asc) => result.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductOrder::Price(SortDirection::Desc) => {
                result.sort_by(|a, b| b.price.cmp(&a.price))
            }
        }

        Ok(result)
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let mut state = self.state.write().await;

        let category = match input.category_id {
            Some(category_id) => Some(
                state
                    .categories
                    .get(&category_id)
                    .cloned()
                    .ok_or(ProductError::CategoryNotFound(category_id))?,
            ),
            None => None,
        };

        let stored = state
            .products
            .get_mut(&id)
            .ok_or(ProductError::ProductNotFound(id))?;

        if let Some(category_id) = input.category_id {
            stored.category_id = Some(category_id);
        }
        stored.product.apply_update(input, category);

        tracing::info!(product_id = id, "Updated product");
        state.product(id)
    }

    async fn set_active(&self, id: i64, active: bool) -> ProductResult<Product> {
        let mut state = self.state.write().await;

        let stored = state
            .products
            .get_mut(&id)
            .ok_or(ProductError::ProductNotFound(id))?;
        stored.product.active = active;
        stored.product.updated_at = Utc::now();

        tracing::info!(product_id = id, active, "Changed product activation");
        state.product(id)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogRepository {
    async fn create(&self, name: String) -> ProductResult<ProductCategory> {
        let mut state = self.state.write().await;

        if state.categories.values().any(|c| c.name == name) {
            return Err(ProductError::DuplicateCategory(name));
        }

        state.next_category_id += 1;
        let category = ProductCategory {
            id: state.next_category_id,
            name,
        };
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<ProductCategory>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn find_first_by_name_like(
        &self,
        pattern: &str,
    ) -> ProductResult<Option<ProductCategory>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .find(|c| like_matches(pattern, &c.name))
            .cloned())
    }

    async fn list_names(&self) -> ProductResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.categories.values().map(|c| c.name.clone()).collect())
    }

    async fn rename(&self, id: i64, name: String) -> ProductResult<ProductCategory> {
        let mut state = self.state.write().await;

        if state
            .categories
            .values()
            .any(|c| c.id != id && c.name == name)
        {
            return Err(ProductError::DuplicateCategory(name));
        }

        let category = state
            .categories
            .get_mut(&id)
            .ok_or(ProductError::CategoryNotFound(id))?;
        category.name = name;

        tracing::info!(category_id = id, "Renamed category");
        Ok(category.clone())
    }

    async fn delete_detaching_products(&self, id: i64) -> ProductResult<u64> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&id) {
            return Err(ProductError::CategoryNotFound(id));
        }

        let now = Utc::now();
        let mut detached = 0;
        for stored in state.products.values_mut() {
            if stored.category_id == Some(id) {
                stored.category_id = None;
                stored.product.updated_at = now;
                detached += 1;
            }
        }
        state.categories.remove(&id);

        tracing::info!(category_id = id, detached, "Deleted category");
        Ok(detached)
    }
}

/// SQL `LIKE` semantics: `%` matches any run, `_` one character, `\` escapes.
pub(crate) fn like_matches(pattern: &str, value: &str) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Token {
        Any,
        One,
        Lit(char),
    }

    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Lit(chars.next().unwrap_or('\\')),
            other => Token::Lit(other),
        });
    }

    let value: Vec<char> = value.chars().collect();
    let (mut t, mut v) = (0, 0);
    // Last `%` seen and the value position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match tokens.get(t) {
            Some(Token::One) => {
                t += 1;
                v += 1;
            }
            Some(Token::Lit(c)) if *c == value[v] => {
                t += 1;
                v += 1;
            }
            Some(Token::Any) => {
                backtrack = Some((t, v));
                t += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    t = star + 1;
                    v = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, cents: i64, category_id: Option<i64>) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(cents, 2),
            category_id,
            promo: false,
            active: true,
        }
    }

    #[test]
    fn test_like_matches() {
        assert!(like_matches("swords", "swords"));
        assert!(!like_matches("swords", "sword"));
        assert!(like_matches("sw%", "swords"));
        assert!(like_matches("%ord%", "swords"));
        assert!(like_matches("%s", "swords"));
        assert!(like_matches("_words", "swords"));
        assert!(!like_matches("_ords", "swords"));
        assert!(like_matches("%", ""));
        assert!(!like_matches("_", ""));
        assert!(like_matches("a%b%c", "aXXbYYc"));
        assert!(!like_matches("a%b%c", "aXXbYY"));
        assert!(like_matches("100\\%", "100%"));
        assert!(!like_matches("100\\%", "1000"));
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicate_name() {
        let repo = InMemoryCatalogRepository::new();
        CategoryRepository::create(&repo, "swords".into()).await.unwrap();

        let err = CategoryRepository::create(&repo, "swords".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DuplicateCategory(name) if name == "swords"));
    }

    #[tokio::test]
    async fn test_product_reads_current_category_name() {
        let repo = InMemoryCatalogRepository::new();
        let cat = CategoryRepository::create(&repo, "swords".into()).await.unwrap();
        let p = ProductRepository::create(&repo, product("Katana", 12000, Some(cat.id)))
            .await
            .unwrap();

        repo.rename(cat.id, "blades".into()).await.unwrap();

        let fetched = ProductRepository::get_by_id(&repo, p.id).await.unwrap().unwrap();
        assert_eq!(fetched.category_name(), Some("blades"));
    }

    #[tokio::test]
    async fn test_delete_detaches_only_products_in_that_category() {
        let repo = InMemoryCatalogRepository::new();
        let swords = CategoryRepository::create(&repo, "swords".into()).await.unwrap();
        let axes = CategoryRepository::create(&repo, "axes".into()).await.unwrap();

        let p1 = ProductRepository::create(&repo, product("Katana", 100, Some(swords.id)))
            .await
            .unwrap();
        let p2 = ProductRepository::create(&repo, product("Sabre", 200, Some(swords.id)))
            .await
            .unwrap();
        let p3 = ProductRepository::create(&repo, product("Hatchet", 300, Some(axes.id)))
            .await
            .unwrap();

        let detached = repo.delete_detaching_products(swords.id).await.unwrap();
        assert_eq!(detached, 2);

        for id in [p1.id, p2.id] {
            let p = ProductRepository::get_by_id(&repo, id).await.unwrap().unwrap();
            assert!(p.category.is_none());
        }
        let p3 = ProductRepository::get_by_id(&repo, p3.id).await.unwrap().unwrap();
        assert_eq!(p3.category_name(), Some("axes"));
        assert!(CategoryRepository::get_by_id(&repo, swords.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let repo = InMemoryCatalogRepository::new();
        let err = repo.delete_detaching_products(9).await.unwrap_err();
        assert!(matches!(err, ProductError::CategoryNotFound(9)));
    }

    #[tokio::test]
    async fn test_list_price_order_breaks_ties_by_id() {
        let repo = InMemoryCatalogRepository::new();
        let a = ProductRepository::create(&repo, product("A", 500, None)).await.unwrap();
        let b = ProductRepository::create(&repo, product("B", 100, None)).await.unwrap();
        let c = ProductRepository::create(&repo, product("C", 500, None)).await.unwrap();

        let asc = ProductRepository::list(
            &repo,
            ProductQuery {
                order: ProductOrder::Price(SortDirection::Asc),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<i64> = asc.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);

        let desc = ProductRepository::list(
            &repo,
            ProductQuery {
                order: ProductOrder::Price(SortDirection::Desc),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<i64> = desc.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[tokio::test]
    async fn test_list_filters_combine() {
        let repo = InMemoryCatalogRepository::new();
        let swords = CategoryRepository::create(&repo, "swords".into()).await.unwrap();

        let mut promo = product("Long Sword", 100, Some(swords.id));
        promo.promo = true;
        ProductRepository::create(&repo, promo).await.unwrap();
        ProductRepository::create(&repo, product("Short Sword", 100, Some(swords.id)))
            .await
            .unwrap();
        ProductRepository::create(&repo, product("Sword Rack", 100, None))
            .await
            .unwrap();

        let found = ProductRepository::list(
            &repo,
            ProductQuery {
                category: Some("swords".into()),
                name_contains: Some("Sword".into()),
                promo_only: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Long Sword");
    }
}
