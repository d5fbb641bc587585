use async_trait::async_trait;
use tokio::sync::RwLock;

use kihsa_core::catalog::CatalogSource;
use kihsa_core::domain::category::CategoryName;
use kihsa_core::domain::product::{Product, ProductId};
use kihsa_core::errors::ApplicationError;

use super::{ProductRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.read().await.clone())
    }

    async fn list_by_category(
        &self,
        category: CategoryName,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|product| product.category == category).cloned().collect())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| &product.id == id).cloned())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        product.validate()?;
        let mut products = self.products.write().await;
        match products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[async_trait]
impl CatalogSource for InMemoryProductRepository {
    fn describe(&self) -> &'static str {
        "memory"
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.list().await?)
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.find_by_id(id).await?)
    }
}
