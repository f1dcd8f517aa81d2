//! # basket-core
//!
//! Core types, repository traits and services for the basket-rs store
//! backend.
//!
//! This crate provides:
//! - `CartStore` for adding, removing and totalling cart snapshots
//! - `AddressBookService` for the two-slot (home/work) address book
//! - `OrderLedger` for cart checkout and instant buy as resumable workflows
//! - `pricing::total` for overflow-checked price sums
//! - `CatalogRepository` and `AccountRepository` traits for storage
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use basket_core::{CartStore, Deadlines, OrderLedger};
//!
//! let cart = CartStore::new(catalog.clone(), accounts.clone(), Deadlines::default());
//! let ledger = OrderLedger::new(catalog, accounts, Deadlines::default());
//!
//! cart.add_to_cart(account_id, product_id).await?;
//! let view = cart.get_cart_total(account_id).await?;
//!
//! // Moves the cart into a new order and clears it
//! let order_id = ledger.checkout_cart(account_id).await?;
//! ```

pub mod account;
pub mod address;
pub mod address_book;
pub mod cart;
pub mod cart_store;
pub mod deadline;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod order;
pub mod pricing;
pub mod product;
pub mod repository;

// Re-exports for convenience
pub use account::{AccountUpdate, UpdateOutcome, UpdateReceipt, UserAccount, Versioned};
pub use address::{Address, AddressBook, AddressFields, AddressSlot};
pub use address_book::{AddressBookService, StoredAddress};
pub use cart::{CartItem, CartView};
pub use cart_store::CartStore;
pub use deadline::Deadlines;
pub use error::{ErrorCategory, ShopError, ShopResult};
pub use ids::{AccountId, AddressId, OrderId, ProductId};
pub use ledger::OrderLedger;
pub use order::{
    CheckoutSource, CheckoutStage, Order, OrderStatus, PaymentMethod, PendingCheckout,
};
pub use product::{Product, ProductCatalog, MAX_RATING, MAX_UNIT_PRICE};
pub use repository::{AccountRepository, CatalogRepository, SharedAccounts, SharedCatalog};
