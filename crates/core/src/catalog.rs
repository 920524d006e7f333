//! Read-only product catalog.
//!
//! The catalog is built once at startup, either from the built-in sample
//! data or from a JSON document, and never changes afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Errors raised while building a catalog from external data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image reference (file name or URL).
    pub image: String,
}

impl Product {
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, price: Price, image: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// Static registry of products, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or a price is negative.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Decode a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails [`Catalog::new`] checks.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// The storefront's built-in product list.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            products: vec![
                Product::new(1, "Music 1", Price::from_cents(999), "label1.webp"),
                Product::new(2, "Music 2", Price::from_cents(1999), "label2.jpg"),
                Product::new(3, "Podcast 1", Price::from_cents(999), "label3.webp"),
                Product::new(4, "Music 3", Price::from_cents(799), "label4.jpg"),
                Product::new(5, "Podcast 2", Price::from_cents(599), "label5.jpg"),
                Product::new(6, "Music 4", Price::from_cents(699), "label6.jpg"),
            ],
        }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
