//! # In-Memory Account Store
//!
//! Account documents keyed by id behind a single `RwLock`. Every update
//! runs under the write lock, which gives the per-document atomicity the
//! services rely on.

use async_trait::async_trait;
use basket_core::{
    AccountId, AccountRepository, AccountUpdate, ShopError, ShopResult, UpdateReceipt,
    UserAccount, Versioned,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::trace;

/// Account repository backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Versioned<UserAccount>>>,
}

impl MemoryAccountStore {
    /// First version assigned to an inserted document
    pub const INITIAL_VERSION: u64 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountStore {
    async fn insert(&self, account: UserAccount) -> ShopResult<u64> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(ShopError::InvalidRequest(format!(
                "account {} already exists",
                account.id
            )));
        }
        accounts.insert(account.id, Versioned::new(Self::INITIAL_VERSION, account));
        Ok(Self::INITIAL_VERSION)
    }

    async fn find(&self, account_id: AccountId) -> ShopResult<Option<Versioned<UserAccount>>> {
        Ok(self.accounts.read().await.get(&account_id).cloned())
    }

    async fn update(
        &self,
        account_id: AccountId,
        expected_version: Option<u64>,
        update: AccountUpdate,
    ) -> ShopResult<UpdateReceipt> {
        let kind = update.kind();
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(&account_id)
            .ok_or_else(|| ShopError::account_not_found(account_id))?;

        if let Some(expected) = expected_version {
            if stored.version != expected {
                return Err(ShopError::VersionConflict {
                    account_id: account_id.to_string(),
                    expected,
                    found: stored.version,
                });
            }
        }

        let outcome = stored.doc.apply(update)?;
        stored.version += 1;
        trace!(%account_id, kind, version = stored.version, "Applied account update");

        Ok(UpdateReceipt {
            version: stored.version,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{Address, AddressFields, UpdateOutcome};

    fn address() -> Address {
        Address::new(AddressFields::new("4", "Park Street", "Kolkata", "700016"))
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryAccountStore::new();
        let account = UserAccount::new(AccountId::new());
        let id = account.id;

        assert_eq!(store.insert(account).await.unwrap(), 1);
        let found = store.find(id).await.unwrap().unwrap();
        assert_eq!(found.version, 1);
        assert!(found.doc.cart.is_empty());

        assert!(store.find(AccountId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = MemoryAccountStore::new();
        let account = UserAccount::new(AccountId::new());
        store.insert(account.clone()).await.unwrap();
        assert!(store.insert(account).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store = MemoryAccountStore::new();
        let account = UserAccount::new(AccountId::new());
        let id = account.id;
        store.insert(account).await.unwrap();

        let receipt = store
            .update(id, None, AccountUpdate::AddAddress(address()))
            .await
            .unwrap();
        assert_eq!(receipt.version, 2);
        assert!(matches!(receipt.outcome, UpdateOutcome::AddressStored(_)));
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let store = MemoryAccountStore::new();
        let account = UserAccount::new(AccountId::new());
        let id = account.id;
        store.insert(account).await.unwrap();
        store
            .update(id, None, AccountUpdate::ClearAddresses)
            .await
            .unwrap();

        let err = store
            .update(id, Some(1), AccountUpdate::AddAddress(address()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::VersionConflict {
                expected: 1,
                found: 2,
                ..
            }
        ));

        let current = store.find(id).await.unwrap().unwrap();
        assert_eq!(current.version, 2);
        assert!(current.doc.addresses.is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_version() {
        let store = MemoryAccountStore::new();
        let account = UserAccount::new(AccountId::new());
        let id = account.id;
        store.insert(account).await.unwrap();
        store.update(id, None, AccountUpdate::AddAddress(address())).await.unwrap();
        store.update(id, None, AccountUpdate::AddAddress(address())).await.unwrap();

        let err = store
            .update(id, None, AccountUpdate::AddAddress(address()))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::SlotLimitExceeded { .. }));
        assert_eq!(store.find(id).await.unwrap().unwrap().version, 3);
    }

    #[tokio::test]
    async fn test_missing_account() {
        let store = MemoryAccountStore::new();
        let err = store
            .update(AccountId::new(), None, AccountUpdate::ClearAddresses)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::AccountNotFound { .. }));
    }
}
