use async_trait::async_trait;
use thiserror::Error;

use kihsa_core::domain::category::CategoryName;
use kihsa_core::domain::product::{Product, ProductId};
use kihsa_core::errors::{ApplicationError, DomainError};

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Invalid(error) => Self::Domain(error),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Product storage. Listings come back in catalog order (first insert first).
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn list_by_category(
        &self,
        category: CategoryName,
    ) -> Result<Vec<Product>, RepositoryError>;
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    /// Inserts or replaces by id; a replaced product keeps its catalog position.
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
}
