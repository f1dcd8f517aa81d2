//! # Repository Traits
//!
//! Storage seams for the services. The services only ever see these traits,
//! so a document database, the in-memory store or a fault-injecting test
//! double can sit behind them.
//!
//! ```text
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │ CatalogRepository (trait) │   │ AccountRepository (trait) │
//! │  ├── lookup()             │   │  ├── insert()             │
//! │  ├── list()               │   │  ├── find()               │
//! │  └── search()             │   │  └── update()             │
//! └───────────────────────────┘   └───────────────────────────┘
//!              ▲                                ▲
//!      ┌───────┴───────┐                ┌───────┴────────────┐
//!      │ MemoryCatalog │                │ MemoryAccountStore │
//!      └───────────────┘                └────────────────────┘
//! ```

use crate::account::{AccountUpdate, UpdateReceipt, UserAccount, Versioned};
use crate::error::{ShopError, ShopResult};
use crate::ids::{AccountId, ProductId};
use crate::product::Product;
use async_trait::async_trait;
use std::sync::Arc;

/// Read access to product records.
///
/// The catalog is owned elsewhere; this crate never writes to it.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch one product, `None` if the id is unknown
    async fn lookup(&self, product_id: ProductId) -> ShopResult<Option<Product>>;

    /// Every product in the catalog
    async fn list(&self) -> ShopResult<Vec<Product>>;

    /// Products whose name contains `query`, case-insensitively
    async fn search(&self, query: &str) -> ShopResult<Vec<Product>>;
}

/// Document-level access to user accounts.
///
/// Every `update` is atomic for the one document it touches. Nothing spans
/// documents.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Store a new account document, returning its initial version
    async fn insert(&self, account: UserAccount) -> ShopResult<u64>;

    /// Load an account with its current version
    async fn find(&self, account_id: AccountId) -> ShopResult<Option<Versioned<UserAccount>>>;

    /// Apply `update` to one account.
    ///
    /// When `expected_version` is set and the stored version differs, fails
    /// with `VersionConflict` and leaves the document unchanged. A missing
    /// account fails with `AccountNotFound`.
    async fn update(
        &self,
        account_id: AccountId,
        expected_version: Option<u64>,
        update: AccountUpdate,
    ) -> ShopResult<UpdateReceipt>;
}

/// Shared catalog handle
pub type SharedCatalog = Arc<dyn CatalogRepository>;

/// Shared account store handle
pub type SharedAccounts = Arc<dyn AccountRepository>;

/// Load an account or fail with `AccountNotFound`
pub(crate) async fn require_account(
    accounts: &SharedAccounts,
    account_id: AccountId,
) -> ShopResult<Versioned<UserAccount>> {
    accounts
        .find(account_id)
        .await?
        .ok_or_else(|| ShopError::account_not_found(account_id))
}

/// Snapshot source lookup; an unknown id is `ProductNotFound`
pub(crate) async fn require_product(
    catalog: &SharedCatalog,
    product_id: ProductId,
) -> ShopResult<Product> {
    catalog
        .lookup(product_id)
        .await?
        .ok_or_else(|| ShopError::product_not_found(product_id))
}
