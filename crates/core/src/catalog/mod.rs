//! In-memory catalog queries.
//!
//! Every query is a pure function of the product list it was built with.
//! Absence is an empty `Vec` or `None`, never an error.

pub mod sample;
pub mod source;

use crate::domain::category::{Category, CategoryFilter, CategoryName, CategorySlug};
use crate::domain::product::{Product, ProductId};

pub use source::CatalogSource;

/// Upper bound on "you may also like" results.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The twelve-piece storefront collection.
    pub fn sample() -> Self {
        Self::new(sample::products())
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn by_filter(&self, filter: &CategoryFilter) -> Vec<Product> {
        match filter {
            CategoryFilter::All => self.products.clone(),
            CategoryFilter::Category(slug) => {
                let name = slug.category_name();
                self.products.iter().filter(|product| product.category == name).cloned().collect()
            }
            CategoryFilter::Unknown(_) => Vec::new(),
        }
    }

    pub fn by_category_slug(&self, slug: &str) -> Vec<Product> {
        self.by_filter(&CategoryFilter::parse(slug))
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn related(&self, current_id: &ProductId, category: CategoryName) -> Vec<Product> {
        self.products
            .iter()
            .filter(|product| product.category == category && &product.id != current_id)
            .take(RELATED_PRODUCTS_LIMIT)
            .cloned()
            .collect()
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<Category> {
        let slug = CategorySlug::parse(slug)?;
        Some(Category::for_slug(slug, self.count_for(slug)))
    }

    pub fn categories(&self) -> Vec<Category> {
        CategorySlug::ALL.into_iter().map(|slug| Category::for_slug(slug, self.count_for(slug))).collect()
    }

    fn count_for(&self, slug: CategorySlug) -> usize {
        let name = slug.category_name();
        self.products.iter().filter(|product| product.category == name).count()
    }
}
