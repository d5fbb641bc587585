//! Page-facing reads over any [`CatalogSource`].
//!
//! Source failures are logged and served as empty results, so a page can only
//! tell "nothing to show" apart from "found" and never sees an error.

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::catalog::CatalogSource;
use crate::domain::category::{Category, CategoryFilter, CategoryName, CategorySlug};
use crate::domain::product::{Product, ProductId};
use crate::errors::ApplicationError;

#[derive(Clone)]
pub struct Storefront {
    source: Arc<dyn CatalogSource>,
}

/// Everything the product detail page renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    pub product: Product,
    pub category_slug: CategorySlug,
    pub material: &'static str,
    pub in_stock: bool,
    pub related: Vec<Product>,
}

/// Everything the category listing page renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryPage {
    /// `None` for the "all" listing and for unknown slugs.
    pub category: Option<Category>,
    pub products: Vec<Product>,
}

impl Storefront {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn CatalogSource> {
        &self.source
    }

    pub async fn products(&self, slug: &str) -> Vec<Product> {
        let result = match CategoryFilter::parse(slug) {
            CategoryFilter::All => self.source.list_products().await,
            _ => self.source.products_by_category(slug).await,
        };
        self.or_default("products_by_category", result)
    }

    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        self.or_default("product", self.source.product(id).await)
    }

    pub async fn related_products(&self, id: &ProductId, category: CategoryName) -> Vec<Product> {
        self.or_default("related_products", self.source.related_products(id, category).await)
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.or_default("categories", self.source.categories().await)
    }

    pub async fn category(&self, slug: &str) -> Option<Category> {
        self.or_default("category", self.source.category(slug).await)
    }

    pub async fn category_page(&self, slug: &str) -> CategoryPage {
        CategoryPage { category: self.category(slug).await, products: self.products(slug).await }
    }

    pub async fn product_page(&self, id: &ProductId) -> Option<ProductPage> {
        let product = self.product(id).await?;
        let related = self.related_products(&product.id, product.category).await;

        Some(ProductPage {
            category_slug: product.category.slug(),
            material: product.category.material(),
            in_stock: product.in_stock(),
            related,
            product,
        })
    }

    fn or_default<T: Default>(&self, operation: &'static str, result: Result<T, ApplicationError>) -> T {
        result.unwrap_or_else(|err| {
            error!(
                event_name = "storefront.source.failed",
                source = self.source.describe(),
                operation,
                error = %err,
                "catalog source failed; serving empty result"
            );
            T::default()
        })
    }
}
