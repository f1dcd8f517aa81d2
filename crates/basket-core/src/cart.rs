//! # Cart Types
//!
//! Cart entries are denormalized product snapshots. An entry is a copy taken
//! when the product entered the cart; later catalog edits never reach it.

use crate::error::ShopResult;
use crate::ids::ProductId;
use crate::pricing;
use crate::product::Product;
use serde::{Deserialize, Serialize};

/// A product snapshot held in a cart or an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID at snapshot time
    pub product_id: ProductId,

    /// Product name (denormalized for display)
    pub name: String,

    /// Price in the smallest currency unit, frozen at snapshot time
    pub price: u64,

    pub rating: u8,

    pub image: String,
}

impl CartItem {
    /// Snapshot a catalog record
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            rating: product.rating,
            image: product.image.clone(),
        }
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self::from_product(product)
    }
}

/// Current cart contents with a freshly computed total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: u64,
}

impl CartView {
    pub fn from_items(items: Vec<CartItem>) -> ShopResult<Self> {
        let total = pricing::total(&items)?;
        Ok(Self { items, total })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries; duplicates count separately
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
