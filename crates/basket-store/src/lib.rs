//! # basket-store
//!
//! In-memory implementations of the basket-core repositories.
//!
//! - **MemoryAccountStore** - account documents with per-document atomic,
//!   version-checked updates
//! - **MemoryCatalog** - product records loaded from `config/products.toml`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use basket_store::{MemoryAccountStore, MemoryCatalog};
//! use basket_core::{CartStore, Deadlines, SharedAccounts, SharedCatalog};
//! use std::sync::Arc;
//!
//! let catalog: SharedCatalog = Arc::new(MemoryCatalog::load(None)?);
//! let accounts: SharedAccounts = Arc::new(MemoryAccountStore::new());
//!
//! let cart = CartStore::new(catalog, accounts, Deadlines::default());
//! ```

pub mod account;
pub mod catalog;

// Re-exports
pub use account::MemoryAccountStore;
pub use catalog::{MemoryCatalog, CATALOG_SEARCH_PATHS};
