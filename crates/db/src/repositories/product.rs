use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;

use kihsa_core::catalog::CatalogSource;
use kihsa_core::domain::category::{CategoryFilter, CategoryName};
use kihsa_core::domain::product::{Product, ProductId};
use kihsa_core::errors::ApplicationError;

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

const SELECT_PRODUCT: &str = "SELECT id, name, category, price, stock, image FROM product";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: String = row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let stock: i64 = row.try_get("stock").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image: String = row.try_get("image").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let category = CategoryName::from_str(&category)
        .map_err(|e| RepositoryError::Decode(format!("product `{id}`: {e}")))?;
    let price = Decimal::from_str(&price)
        .map_err(|e| RepositoryError::Decode(format!("product `{id}` price `{price}`: {e}")))?;
    let stock = u32::try_from(stock)
        .map_err(|_| RepositoryError::Decode(format!("product `{id}` stock `{stock}` out of range")))?;

    Ok(Product { id: ProductId(id), name, category, price, stock, image })
}

#[async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_PRODUCT} ORDER BY position ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn list_by_category(
        &self,
        category: CategoryName,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows =
            sqlx::query(&format!("{SELECT_PRODUCT} WHERE category = ? ORDER BY position ASC"))
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_PRODUCT} WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_product).transpose()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        product.validate()?;
        sqlx::query(
            "INSERT INTO product (id, position, name, category, price, stock, image) \
             VALUES (?, (SELECT COALESCE(MAX(position), 0) + 1 FROM product), ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                name = excluded.name, \
                category = excluded.category, \
                price = excluded.price, \
                stock = excluded.stock, \
                image = excluded.image",
        )
        .bind(&product.id.0)
        .bind(&product.name)
        .bind(product.category.as_str())
        .bind(product.price.to_string())
        .bind(i64::from(product.stock))
        .bind(&product.image)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product").fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl CatalogSource for SqlProductRepository {
    fn describe(&self) -> &'static str {
        "database"
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.list().await?)
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, ApplicationError> {
        match CategoryFilter::parse(slug) {
            CategoryFilter::All => Ok(self.list().await?),
            CategoryFilter::Category(slug) => Ok(self.list_by_category(slug.category_name()).await?),
            CategoryFilter::Unknown(_) => Ok(Vec::new()),
        }
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.find_by_id(id).await?)
    }
}
