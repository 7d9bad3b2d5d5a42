use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateCategory, ProductCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Service layer for category business logic
#[derive(Clone)]
pub struct CategoryService<C: CategoryRepository> {
    repository: Arc<C>,
}

/// Trim, lower-case and length-check a category name
fn normalize_name(raw: &str) -> ProductResult<String> {
    let input = CreateCategory {
        name: raw.trim().to_lowercase(),
    };
    input
        .validate()
        .map_err(|e| ProductError::Validation(e.to_string()))?;
    Ok(input.name)
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(repository: C) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn ensure_name_is_free(&self, name: &str) -> ProductResult<()> {
        let names = self.repository.list_names().await?;
        if names.iter().any(|existing| existing == name) {
            return Err(ProductError::DuplicateCategory(name.to_string()));
        }
        Ok(())
    }

    /// Create a category; names are unique once lower-cased
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn save(&self, input: CreateCategory) -> ProductResult<ProductCategory> {
        let name = normalize_name(&input.name)?;
        self.ensure_name_is_free(&name).await?;
        self.repository.create(name).await
    }

    /// Rename a category.
    ///
    /// The duplicate check runs before the existence check and also covers the
    /// category's own current name.
    #[instrument(skip(self, input), fields(category_id = id))]
    pub async fn update(&self, id: i64, input: UpdateCategory) -> ProductResult<ProductCategory> {
        let name = normalize_name(&input.name)?;
        self.ensure_name_is_free(&name).await?;

        if self.repository.get_by_id(id).await?.is_none() {
            return Err(ProductError::CategoryNotFound(id));
        }

        self.repository.rename(id, name).await
    }

    /// First category, by id, whose name matches a SQL `LIKE` pattern
    #[instrument(skip(self))]
    pub async fn get_one_by_name(&self, pattern: &str) -> ProductResult<ProductCategory> {
        self.repository
            .find_first_by_name_like(pattern)
            .await?
            .ok_or_else(|| ProductError::CategoryNameNotFound(pattern.to_string()))
    }

    #[instrument(skip(self), fields(category_id = id))]
    pub async fn get_by_id(&self, id: i64) -> ProductResult<ProductCategory> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::CategoryNotFound(id))
    }

    pub async fn get_category_names(&self) -> ProductResult<Vec<String>> {
        self.repository.list_names().await
    }

    /// Delete a category after detaching every product that references it
    #[instrument(skip(self), fields(category_id = id))]
    pub async fn remove_by_id(&self, id: i64) -> ProductResult<ProductCategory> {
        let category = self.get_by_id(id).await?;
        let detached = self.repository.delete_detaching_products(id).await?;

        tracing::info!(
            category_id = id,
            detached_products = detached,
            "Removed category"
        );
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCatalogRepository, MockCategoryRepository};
    use mockall::predicate::eq;

    fn create(name: &str) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
        }
    }

    fn rename(name: &str) -> UpdateCategory {
        UpdateCategory {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_lower_cases_name() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());

        let saved = service.save(create("  Swords ")).await.unwrap();
        assert_eq!(saved.name, "swords");
    }

    #[tokio::test]
    async fn test_save_case_variant_is_duplicate() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());
        service.save(create("Swords")).await.unwrap();

        for variant in ["swords", "SWORDS", "sWoRdS"] {
            let err = service.save(create(variant)).await.unwrap_err();
            assert!(
                matches!(&err, ProductError::DuplicateCategory(name) if name == "swords"),
                "{variant}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_save_rejects_blank_name() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());
        let err = service.save(create("   ")).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_id_reports_that_id() {
        let mut mock = MockCategoryRepository::new();
        mock.expect_list_names()
            .returning(|| Ok(vec!["swords".to_string()]));
        mock.expect_get_by_id().with(eq(5)).returning(|_| Ok(None));
        mock.expect_rename().never();

        let service = CategoryService::new(mock);
        let err = service.update(5, rename("Axes")).await.unwrap_err();

        assert!(matches!(err, ProductError::CategoryNotFound(5)));
        assert_eq!(err.to_string(), "Category with id 5 not found");
    }

    #[tokio::test]
    async fn test_update_checks_duplicates_before_existence() {
        let mut mock = MockCategoryRepository::new();
        mock.expect_list_names()
            .returning(|| Ok(vec!["axes".to_string()]));
        mock.expect_get_by_id().never();

        let service = CategoryService::new(mock);
        let err = service.update(42, rename("AXES")).await.unwrap_err();

        assert!(matches!(err, ProductError::DuplicateCategory(name) if name == "axes"));
    }

    #[tokio::test]
    async fn test_update_to_own_name_is_duplicate() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());
        let swords = service.save(create("swords")).await.unwrap();

        let err = service.update(swords.id, rename("Swords")).await.unwrap_err();
        assert!(matches!(err, ProductError::DuplicateCategory(_)));
    }

    #[tokio::test]
    async fn test_update_renames() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());
        let swords = service.save(create("swords")).await.unwrap();

        let renamed = service.update(swords.id, rename("Blades")).await.unwrap();
        assert_eq!(renamed.id, swords.id);
        assert_eq!(renamed.name, "blades");
    }

    #[tokio::test]
    async fn test_get_one_by_name_pattern() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());
        service.save(create("swords")).await.unwrap();
        let shields = service.save(create("shields")).await.unwrap();
        service.save(create("shirts")).await.unwrap();

        let found = service.get_one_by_name("sh%").await.unwrap();
        assert_eq!(found, shields);

        let err = service.get_one_by_name("axe%").await.unwrap_err();
        assert!(matches!(err, ProductError::CategoryNameNotFound(p) if p == "axe%"));
    }

    #[tokio::test]
    async fn test_get_category_names_in_id_order() {
        let service = CategoryService::new(InMemoryCatalogRepository::new());
        for name in ["swords", "axes", "bows"] {
            service.save(create(name)).await.unwrap();
        }

        let names = service.get_category_names().await.unwrap();
        assert_eq!(names, vec!["swords", "axes", "bows"]);
    }

    #[tokio::test]
    async fn test_remove_missing_category() {
        let mut mock = MockCategoryRepository::new();
        mock.expect_get_by_id().with(eq(7)).returning(|_| Ok(None));
        mock.expect_delete_detaching_products().never();

        let service = CategoryService::new(mock);
        let err = service.remove_by_id(7).await.unwrap_err();
        assert!(matches!(err, ProductError::CategoryNotFound(7)));
    }

    #[tokio::test]
    async fn test_remove_returns_removed_category() {
        let mut mock = MockCategoryRepository::new();
        mock.expect_get_by_id().with(eq(3)).returning(|id| {
            Ok(Some(ProductCategory {
                id,
                name: "swords".into(),
            }))
        });
        mock.expect_delete_detaching_products()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(2));

        let service = CategoryService::new(mock);
        let removed = service.remove_by_id(3).await.unwrap();
        assert_eq!(removed.name, "swords");
    }
}
