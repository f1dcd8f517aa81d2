//! # Address Book Service
//!
//! Add, edit, list and clear the home/work addresses of an account.
//! The slot limit is checked inside the store update, so two concurrent
//! adds can never push a third address in.

use crate::account::{AccountUpdate, UpdateOutcome};
use crate::address::{Address, AddressBook, AddressFields, AddressSlot};
use crate::deadline::Deadlines;
use crate::error::{ShopError, ShopResult};
use crate::ids::{AccountId, AddressId};
use crate::repository::{require_account, SharedAccounts};
use serde::Serialize;
use tracing::{debug, instrument};

/// Where a newly added address was stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoredAddress {
    pub id: AddressId,
    pub slot: AddressSlot,
}

#[derive(Clone)]
pub struct AddressBookService {
    accounts: SharedAccounts,
    deadlines: Deadlines,
}

impl AddressBookService {
    pub fn new(accounts: SharedAccounts, deadlines: Deadlines) -> Self {
        Self {
            accounts,
            deadlines,
        }
    }

    /// Store an address in the first free slot (home, then work).
    ///
    /// Fails with `SlotLimitExceeded` once both slots are taken.
    #[instrument(skip(self, details), fields(account_id = %account_id))]
    pub async fn add_address(
        &self,
        account_id: AccountId,
        details: AddressFields,
    ) -> ShopResult<StoredAddress> {
        details.validate()?;
        let address = Address::new(details);
        let id = address.id;

        let receipt = self
            .deadlines
            .mutate(
                "add_address",
                self.accounts
                    .update(account_id, None, AccountUpdate::AddAddress(address)),
            )
            .await?;

        match receipt.outcome {
            UpdateOutcome::AddressStored(slot) => {
                debug!(%slot, "Stored address");
                Ok(StoredAddress { id, slot })
            }
            other => Err(ShopError::Internal(format!(
                "address add answered with {:?}",
                other
            ))),
        }
    }

    /// Overwrite the fields in `slot`; the address id is kept
    #[instrument(skip(self, details), fields(account_id = %account_id, slot = %slot))]
    pub async fn edit_address(
        &self,
        account_id: AccountId,
        slot: AddressSlot,
        details: AddressFields,
    ) -> ShopResult<()> {
        details.validate()?;
        self.deadlines
            .mutate(
                "edit_address",
                self.accounts
                    .update(account_id, None, AccountUpdate::EditAddress {
                        slot,
                        fields: details,
                    }),
            )
            .await?;
        Ok(())
    }

    /// Clear both slots
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn delete_addresses(&self, account_id: AccountId) -> ShopResult<()> {
        self.deadlines
            .mutate(
                "clear_addresses",
                self.accounts
                    .update(account_id, None, AccountUpdate::ClearAddresses),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn list_addresses(&self, account_id: AccountId) -> ShopResult<AddressBook> {
        let account = self
            .deadlines
            .read("load_addresses", require_account(&self.accounts, account_id))
            .await?;
        Ok(account.doc.addresses)
    }
}
