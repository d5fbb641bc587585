use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub subtotal: Decimal,
}

/// Body of `POST /api/cart`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartResponse {
    pub success: bool,
    pub message: String,
}

fn default_quantity() -> u32 {
    1
}

impl AddToCartResponse {
    pub fn added(product_id: &ProductId, quantity: u32) -> Self {
        Self {
            success: true,
            message: format!("Added product {product_id} to cart (quantity: {quantity})"),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` units, merging into an existing line for the same product.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { product_id: product.id.0.clone() });
        }

        match self.items.iter_mut().find(|item| item.product_id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity,
                image: product.image.clone(),
            }),
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().fold(0u32, |total, item| total.saturating_add(item.quantity))
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.price * Decimal::from(item.quantity)).sum()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            items: self.items.clone(),
            total_items: self.total_items(),
            subtotal: self.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::Catalog;
    use crate::domain::product::ProductId;
    use crate::errors::DomainError;

    use super::{AddToCartRequest, Cart};

    #[test]
    fn adding_the_same_product_merges_quantities() {
        let catalog = Catalog::sample();
        let ring = catalog.find(&ProductId::new("1")).expect("sample ring");
        let studs = catalog.find(&ProductId::new("12")).expect("sample studs");

        let mut cart = Cart::default();
        cart.add(ring, 1).expect("add ring");
        cart.add(studs, 2).expect("add studs");
        cart.add(ring, 2).expect("add ring again");

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 5);
        // 3 x 1299.99 + 2 x 499.99
        assert_eq!(cart.subtotal(), Decimal::new(489_995, 2));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let catalog = Catalog::sample();
        let ring = catalog.find(&ProductId::new("1")).expect("sample ring");

        let error = Cart::default().add(ring, 0).expect_err("zero quantity");
        assert_eq!(error, DomainError::InvalidQuantity { product_id: "1".to_owned() });
    }

    #[test]
    fn removing_a_line_updates_totals() {
        let catalog = Catalog::sample();
        let mut cart = Cart::default();
        cart.add(catalog.find(&ProductId::new("6")).expect("sample"), 1).expect("add");

        let removed = cart.remove(&ProductId::new("6")).expect("line should exist");
        assert_eq!(removed.quantity, 1);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert!(cart.remove(&ProductId::new("6")).is_none());
    }

    #[test]
    fn cart_request_defaults_quantity_to_one() {
        let request: AddToCartRequest =
            serde_json::from_str(r#"{"product_id":"3"}"#).expect("request should decode");

        assert_eq!(request.product_id, ProductId::new("3"));
        assert_eq!(request.quantity, 1);
    }
}
