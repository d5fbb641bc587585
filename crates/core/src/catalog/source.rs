use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::domain::category::{Category, CategoryName};
use crate::domain::product::{Product, ProductId};
use crate::errors::ApplicationError;

/// Where catalog data comes from.
///
/// Only `list_products` is required; the remaining queries default to the
/// in-memory [`Catalog`] rules applied to the full listing, so overriding
/// them (for example to push filtering to a remote backend) must preserve
/// those semantics.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short label used in logs and health output.
    fn describe(&self) -> &'static str;

    async fn list_products(&self) -> Result<Vec<Product>, ApplicationError>;

    async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, ApplicationError> {
        Ok(Catalog::new(self.list_products().await?).by_category_slug(slug))
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.list_products().await?.into_iter().find(|product| &product.id == id))
    }

    async fn related_products(
        &self,
        id: &ProductId,
        category: CategoryName,
    ) -> Result<Vec<Product>, ApplicationError> {
        Ok(Catalog::new(self.list_products().await?).related(id, category))
    }

    async fn categories(&self) -> Result<Vec<Category>, ApplicationError> {
        Ok(Catalog::new(self.list_products().await?).categories())
    }

    /// Card for one routable slug; `None` for "all" and unknown slugs.
    async fn category(&self, slug: &str) -> Result<Option<Category>, ApplicationError> {
        Ok(Catalog::new(self.list_products().await?).category_by_slug(slug))
    }
}

#[async_trait]
impl CatalogSource for Catalog {
    fn describe(&self) -> &'static str {
        "static"
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.all().to_vec())
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.by_category_slug(slug))
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.find(id).cloned())
    }

    async fn related_products(
        &self,
        id: &ProductId,
        category: CategoryName,
    ) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.related(id, category))
    }

    async fn categories(&self) -> Result<Vec<Category>, ApplicationError> {
        Ok(Catalog::categories(self))
    }

    async fn category(&self, slug: &str) -> Result<Option<Category>, ApplicationError> {
        Ok(self.category_by_slug(slug))
    }
}

#[async_trait]
impl<S> CatalogSource for Arc<S>
where
    S: CatalogSource + ?Sized,
{
    fn describe(&self) -> &'static str {
        (**self).describe()
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        (**self).list_products().await
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, ApplicationError> {
        (**self).products_by_category(slug).await
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApplicationError> {
        (**self).product(id).await
    }

    async fn related_products(
        &self,
        id: &ProductId,
        category: CategoryName,
    ) -> Result<Vec<Product>, ApplicationError> {
        (**self).related_products(id, category).await
    }

    async fn categories(&self) -> Result<Vec<Category>, ApplicationError> {
        (**self).categories().await
    }

    async fn category(&self, slug: &str) -> Result<Option<Category>, ApplicationError> {
        (**self).category(slug).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::catalog::Catalog;
    use crate::domain::category::CategoryName;
    use crate::domain::product::{Product, ProductId};
    use crate::errors::ApplicationError;

    use super::CatalogSource;

    /// Implements only the required method so the defaults are exercised.
    struct ListingOnly(Catalog);

    #[async_trait]
    impl CatalogSource for ListingOnly {
        fn describe(&self) -> &'static str {
            "listing-only"
        }

        async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
            Ok(self.0.all().to_vec())
        }
    }

    #[tokio::test]
    async fn default_queries_match_the_in_memory_catalog() {
        let catalog = Catalog::sample();
        let source = ListingOnly(catalog.clone());

        for slug in ["all", "rings", "necklace", "bangles", "earrings", "watches"] {
            assert_eq!(
                source.products_by_category(slug).await.expect("listing"),
                catalog.by_category_slug(slug),
                "slug {slug}"
            );
        }

        let id = ProductId::new("4");
        assert_eq!(source.product(&id).await.expect("lookup"), catalog.find(&id).cloned());
        assert_eq!(
            source.related_products(&id, CategoryName::Earrings).await.expect("related"),
            catalog.related(&id, CategoryName::Earrings)
        );
        assert_eq!(source.categories().await.expect("categories"), catalog.categories());

        for slug in ["all", "rings", "necklace", "earings", "bracelets", "Rings"] {
            assert_eq!(
                source.category(slug).await.expect("category"),
                catalog.category_by_slug(slug),
                "slug {slug}"
            );
        }
    }

    #[tokio::test]
    async fn shared_source_delegates_through_arc() {
        let source: std::sync::Arc<dyn CatalogSource> = std::sync::Arc::new(Catalog::sample());

        assert_eq!(source.describe(), "static");
        assert!(source.product(&ProductId::new("999")).await.expect("lookup").is_none());
        assert_eq!(source.list_products().await.expect("listing").len(), 12);
        assert_eq!(
            source.category("earings").await.expect("category").map(|category| category.count),
            Some(3)
        );
    }
}
