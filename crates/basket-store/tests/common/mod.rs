//! Shared fixtures for the service tests.

#![allow(dead_code)]

use async_trait::async_trait;
use basket_core::{
    AccountId, AccountRepository, AccountUpdate, AddressBookService, AddressFields, CartStore,
    Deadlines, OrderLedger, Product, ProductId, ShopError, ShopResult, UpdateReceipt, UserAccount,
    Versioned,
};
use basket_store::{MemoryAccountStore, MemoryCatalog};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operation name used for `find` in [`FlakyAccounts`]
pub const FIND: &str = "find";

/// Account store wrapper that can fail or stall chosen operations.
///
/// Operations are matched by [`AccountUpdate::kind`], or [`FIND`] for reads.
/// Injected failures happen before the wrapped store is touched.
#[derive(Default)]
pub struct FlakyAccounts {
    inner: MemoryAccountStore,
    failures: Mutex<HashMap<&'static str, usize>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
}

impl FlakyAccounts {
    /// Fail the next `times` calls of `operation` with `StoreUnavailable`
    pub fn fail(&self, operation: &'static str, times: usize) {
        self.failures.lock().unwrap().insert(operation, times);
    }

    /// Sleep `delay` before every call of `operation`
    pub fn stall(&self, operation: &'static str, delay: Duration) {
        self.delays.lock().unwrap().insert(operation, delay);
    }

    pub fn clear_faults(&self) {
        self.failures.lock().unwrap().clear();
        self.delays.lock().unwrap().clear();
    }

    async fn intercept(&self, operation: &'static str) -> ShopResult<()> {
        let delay = self.delays.lock().unwrap().get(operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut failures = self.failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(operation) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ShopError::StoreUnavailable(format!(
                    "injected failure on {}",
                    operation
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for FlakyAccounts {
    async fn insert(&self, account: UserAccount) -> ShopResult<u64> {
        self.inner.insert(account).await
    }

    async fn find(&self, account_id: AccountId) -> ShopResult<Option<Versioned<UserAccount>>> {
        self.intercept(FIND).await?;
        self.inner.find(account_id).await
    }

    async fn update(
        &self,
        account_id: AccountId,
        expected_version: Option<u64>,
        update: AccountUpdate,
    ) -> ShopResult<UpdateReceipt> {
        self.intercept(update.kind()).await?;
        self.inner.update(account_id, expected_version, update).await
    }
}

/// Services wired to one catalog and one flaky account store
pub struct Shop {
    pub catalog: Arc<MemoryCatalog>,
    pub accounts: Arc<FlakyAccounts>,
    pub cart: CartStore,
    pub addresses: AddressBookService,
    pub ledger: OrderLedger,
}

impl Shop {
    pub fn new() -> Self {
        Self::with_deadlines(Deadlines::default())
    }

    pub fn with_deadlines(deadlines: Deadlines) -> Self {
        let catalog = Arc::new(MemoryCatalog::default());
        let accounts = Arc::new(FlakyAccounts::default());

        Self {
            cart: CartStore::new(catalog.clone(), accounts.clone(), deadlines),
            addresses: AddressBookService::new(accounts.clone(), deadlines),
            ledger: OrderLedger::new(catalog.clone(), accounts.clone(), deadlines),
            catalog,
            accounts,
        }
    }

    /// Add a product to the catalog and return its id
    pub async fn product(&self, name: &str, price: u64) -> ProductId {
        let product = Product::new(ProductId::new(), name, price).with_rating(4);
        let id = product.id;
        self.catalog.upsert(product).await.unwrap();
        id
    }

    /// Provision an empty account
    pub async fn account(&self) -> AccountId {
        let account = UserAccount::new(AccountId::new());
        let id = account.id;
        self.accounts.insert(account).await.unwrap();
        id
    }

    /// Current document, bypassing injected faults
    pub async fn stored(&self, account_id: AccountId) -> UserAccount {
        self.accounts.inner.find(account_id).await.unwrap().unwrap().doc
    }
}

pub fn fields(house: &str) -> AddressFields {
    AddressFields::new(house, "Linking Road", "Mumbai", "400050")
}
