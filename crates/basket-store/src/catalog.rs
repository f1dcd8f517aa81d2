//! # In-Memory Catalog
//!
//! Product records loaded once from `config/products.toml`. Catalog
//! administration lives elsewhere; `upsert` and `set_price` exist so that
//! seeding and price-change scenarios can be driven in-process.

use async_trait::async_trait;
use basket_core::{CatalogRepository, Product, ProductCatalog, ProductId, ShopError, ShopResult};
use std::path::Path;
use tokio::sync::RwLock;

/// Locations searched for the catalog file when no path is configured
pub const CATALOG_SEARCH_PATHS: [&str; 3] = [
    "config/products.toml",
    "../config/products.toml",
    "../../config/products.toml",
];

/// Catalog repository over an in-process [`ProductCatalog`]
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    catalog: RwLock<ProductCatalog>,
}

impl MemoryCatalog {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    /// Load from `path`, or search [`CATALOG_SEARCH_PATHS`] when `None`.
    ///
    /// An explicit path must exist. With no path and no file found the
    /// catalog starts empty.
    pub fn load(path: Option<&Path>) -> ShopResult<Self> {
        if let Some(path) = path {
            let catalog = read_catalog(path)?;
            tracing::info!("Loaded {} products from {}", catalog.len(), path.display());
            return Ok(Self::new(catalog));
        }

        for candidate in CATALOG_SEARCH_PATHS {
            let candidate = Path::new(candidate);
            if candidate.is_file() {
                let catalog = read_catalog(candidate)?;
                tracing::info!(
                    "Loaded {} products from {}",
                    catalog.len(),
                    candidate.display()
                );
                return Ok(Self::new(catalog));
            }
        }

        tracing::warn!("No product catalog found, using empty catalog");
        Ok(Self::default())
    }

    /// Insert or replace a product record
    pub async fn upsert(&self, product: Product) -> ShopResult<()> {
        product.validate()?;
        self.catalog.write().await.upsert(product);
        Ok(())
    }

    /// Change the catalog price of a product
    pub async fn set_price(&self, product_id: ProductId, price: u64) -> ShopResult<()> {
        let mut catalog = self.catalog.write().await;
        let product = catalog
            .get_mut(product_id)
            .ok_or_else(|| ShopError::product_not_found(product_id))?;

        let mut updated = product.clone();
        updated.price = price;
        updated.validate()?;
        *product = updated;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.catalog.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.catalog.read().await.is_empty()
    }
}

fn read_catalog(path: &Path) -> ShopResult<ProductCatalog> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ShopError::Configuration(format!("failed to read {}: {}", path.display(), e))
    })?;
    ProductCatalog::from_toml(&content)
        .map_err(|e| ShopError::Configuration(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn lookup(&self, product_id: ProductId) -> ShopResult<Option<Product>> {
        Ok(self.catalog.read().await.get(product_id).cloned())
    }

    async fn list(&self) -> ShopResult<Vec<Product>> {
        Ok(self.catalog.read().await.products.clone())
    }

    async fn search(&self, query: &str) -> ShopResult<Vec<Product>> {
        Ok(self.catalog.read().await.search(query).cloned().collect())
    }
}
