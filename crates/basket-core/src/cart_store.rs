//! # Cart Store
//!
//! Add, remove and total the snapshots in an account's cart.

use crate::account::{AccountUpdate, UpdateOutcome};
use crate::cart::{CartItem, CartView};
use crate::deadline::Deadlines;
use crate::error::{ShopError, ShopResult};
use crate::ids::{AccountId, ProductId};
use crate::repository::{require_account, require_product, SharedAccounts, SharedCatalog};
use tracing::{debug, instrument};

/// Cart operations over the catalog and account repositories
#[derive(Clone)]
pub struct CartStore {
    catalog: SharedCatalog,
    accounts: SharedAccounts,
    deadlines: Deadlines,
}

impl CartStore {
    pub fn new(catalog: SharedCatalog, accounts: SharedAccounts, deadlines: Deadlines) -> Self {
        Self {
            catalog,
            accounts,
            deadlines,
        }
    }

    /// Snapshot the product and append it to the cart.
    ///
    /// Adding the same product twice stores two copies; duplication is the
    /// quantity. Returns the stored snapshot.
    #[instrument(skip(self), fields(account_id = %account_id, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> ShopResult<CartItem> {
        let product = self
            .deadlines
            .mutate("lookup_product", require_product(&self.catalog, product_id))
            .await?;
        let item = CartItem::from_product(&product);

        self.deadlines
            .mutate(
                "push_cart_item",
                self.accounts
                    .update(account_id, None, AccountUpdate::PushCartItem(item.clone())),
            )
            .await?;

        debug!(price = item.price, "Added item to cart");
        Ok(item)
    }

    /// Remove every cart entry for `product_id`, returning how many went.
    ///
    /// Nothing matching is a success with zero removed.
    #[instrument(skip(self), fields(account_id = %account_id, product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> ShopResult<usize> {
        let receipt = self
            .deadlines
            .mutate(
                "pull_cart_items",
                self.accounts
                    .update(account_id, None, AccountUpdate::PullCartItems(product_id)),
            )
            .await?;

        match receipt.outcome {
            UpdateOutcome::Removed(count) => {
                debug!(count, "Removed items from cart");
                Ok(count)
            }
            other => Err(ShopError::Internal(format!(
                "cart pull answered with {:?}",
                other
            ))),
        }
    }

    /// Current cart with a freshly computed total
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn get_cart_total(&self, account_id: AccountId) -> ShopResult<CartView> {
        let account = self
            .deadlines
            .read("load_cart", require_account(&self.accounts, account_id))
            .await?;

        CartView::from_items(account.doc.cart)
    }
}
