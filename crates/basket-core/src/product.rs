//! # Product Types
//!
//! Catalog records for basket-rs.
//! Products are loaded from `config/products.toml`.

use crate::error::{ShopError, ShopResult};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Largest accepted unit price, in the smallest currency unit.
///
/// Totals are `u64`, so a cart would need more than `u32::MAX` entries at
/// this price before a sum could overflow.
pub const MAX_UNIT_PRICE: u64 = u32::MAX as u64;

/// Highest rating a product can carry
pub const MAX_RATING: u8 = 5;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Price in the smallest currency unit
    pub price: u64,

    /// Rating, 0 to 5
    #[serde(default)]
    pub rating: u8,

    /// Image reference (URL or asset key)
    #[serde(default)]
    pub image: String,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: u64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            rating: 0,
            image: String::new(),
        }
    }

    /// Builder: set rating
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    /// Builder: set image reference
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check the record against catalog bounds
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.trim().is_empty() {
            return Err(ShopError::Configuration(format!(
                "product {} has an empty name",
                self.id
            )));
        }
        if self.price > MAX_UNIT_PRICE {
            return Err(ShopError::Configuration(format!(
                "product {} price {} exceeds {}",
                self.id, self.price, MAX_UNIT_PRICE
            )));
        }
        if self.rating > MAX_RATING {
            return Err(ShopError::Configuration(format!(
                "product {} rating {} exceeds {}",
                self.id, self.rating, MAX_RATING
            )));
        }
        Ok(())
    }

    /// Case-insensitive name match
    pub fn matches(&self, query: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product, replacing any record with the same id
    pub fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Find a product by ID
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a product by ID for modification
    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Products whose name contains `query`
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.matches(query))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load and validate a catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> ShopResult<Self> {
        let catalog: ProductCatalog = toml::from_str(toml_str)
            .map_err(|e| ShopError::Configuration(format!("invalid catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate every record and reject duplicate ids
    pub fn validate(&self) -> ShopResult<()> {
        let mut seen = std::collections::HashSet::new();
        for product in &self.products {
            product.validate()?;
            if !seen.insert(product.id) {
                return Err(ShopError::Configuration(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        Ok(())
    }
}
