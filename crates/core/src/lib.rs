pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod storefront;

pub use catalog::{Catalog, CatalogSource, RELATED_PRODUCTS_LIMIT};
pub use domain::cart::{AddToCartRequest, AddToCartResponse, Cart, CartItem, CartSummary};
pub use domain::category::{Category, CategoryFilter, CategoryName, CategorySlug, ALL_SLUG};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use storefront::{CategoryPage, ProductPage, Storefront};
