use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryName;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: CategoryName,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    pub image: String,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Rejects records that cannot be listed: blank identifiers and negative prices.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.0.trim().is_empty() {
            return Err(DomainError::InvariantViolation("product id must not be blank".to_owned()));
        }
        if self.price.is_sign_negative() {
            return Err(DomainError::NegativePrice { product_id: self.id.0.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::category::CategoryName;
    use crate::errors::DomainError;

    use super::{Product, ProductId};

    fn ring(price: Decimal) -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Diamond Eternity Ring".to_owned(),
            category: CategoryName::Rings,
            price,
            stock: 10,
            image: "/images/rings/50E4SRFBC2137_1.webp".to_owned(),
        }
    }

    #[test]
    fn deserializes_wire_shape_without_stock() {
        let product: Product = serde_json::from_str(
            r#"{"id":"5","name":"Emerald Tennis Bracelet","category":"Bracelets","price":2499.99,"image":"/images/bangles/511251VXB1A00.webp"}"#,
        )
        .expect("wire product should decode");

        assert_eq!(product.id, ProductId::new("5"));
        assert_eq!(product.category, CategoryName::Bracelets);
        assert_eq!(product.price, Decimal::new(249_999, 2));
        assert_eq!(product.stock, 0);
        assert!(!product.in_stock());
    }

    #[test]
    fn rejects_unknown_category_names() {
        let decoded = serde_json::from_str::<Product>(
            r#"{"id":"X","name":"Anklet","category":"Anklets","price":10,"image":"/x.webp"}"#,
        );
        assert!(decoded.is_err());
    }

    #[test]
    fn negative_price_fails_validation() {
        let error = ring(Decimal::new(-1, 0)).validate().expect_err("negative price");
        assert_eq!(error, DomainError::NegativePrice { product_id: "1".to_owned() });
        assert!(ring(Decimal::ZERO).validate().is_ok());
    }
}
