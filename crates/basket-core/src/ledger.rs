//! # Order Ledger
//!
//! Turns a cart, or a single product, into an order in the account's
//! history. A checkout is a workflow of three single-document updates:
//!
//! ```text
//!  BeginCheckout ──► PopulateOrderItems ──► CompleteCheckout
//!  (order + record)   (items into order)    (clear cart, mark complete)
//! ```
//!
//! The first update is guarded by the document version read beforehand, so
//! of two concurrent checkouts only one can start. The record it leaves on
//! the account makes the remaining steps resumable, and both of them are
//! idempotent. Any failure after the first step comes back as
//! `PartialCheckout` naming the stalled order.

use crate::account::{AccountUpdate, UserAccount, Versioned};
use crate::cart::CartItem;
use crate::deadline::Deadlines;
use crate::error::{ShopError, ShopResult};
use crate::ids::{AccountId, OrderId, ProductId};
use crate::order::{CheckoutSource, CheckoutStage, Order, PendingCheckout};
use crate::pricing;
use crate::repository::{require_account, require_product, SharedAccounts, SharedCatalog};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct OrderLedger {
    catalog: SharedCatalog,
    accounts: SharedAccounts,
    deadlines: Deadlines,
}

impl OrderLedger {
    pub fn new(catalog: SharedCatalog, accounts: SharedAccounts, deadlines: Deadlines) -> Self {
        Self {
            catalog,
            accounts,
            deadlines,
        }
    }

    /// Place an order for everything in the cart and clear it.
    ///
    /// A stalled cart checkout for the account is finished first and its
    /// order id returned, so retrying after `PartialCheckout` never creates
    /// a second order.
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn checkout_cart(&self, account_id: AccountId) -> ShopResult<OrderId> {
        let mut current = self.load(account_id).await?;

        if let Some(pending) = current.doc.pending_checkout.clone() {
            let order_id = self.resume(account_id, &pending).await?;
            if pending.source == CheckoutSource::Cart {
                return Ok(order_id);
            }
            current = self.load(account_id).await?;
        }

        if current.doc.cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let items = current.doc.cart.clone();
        self.place(account_id, Some(current.version), CheckoutSource::Cart, items)
            .await
    }

    /// Order a single product without touching the cart.
    #[instrument(skip(self), fields(account_id = %account_id, product_id = %product_id))]
    pub async fn instant_buy(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> ShopResult<OrderId> {
        let product = self
            .deadlines
            .mutate("lookup_product", require_product(&self.catalog, product_id))
            .await?;

        let current = self.load(account_id).await?;
        if let Some(pending) = current.doc.pending_checkout {
            self.resume(account_id, &pending).await?;
        }

        let items = vec![CartItem::from_product(&product)];
        self.place(account_id, None, CheckoutSource::InstantBuy, items)
            .await
    }

    /// Finish whatever checkout is stalled on the account.
    ///
    /// Returns the finished order id, or `None` when nothing was pending.
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn resume_checkout(&self, account_id: AccountId) -> ShopResult<Option<OrderId>> {
        let current = self.load(account_id).await?;
        match current.doc.pending_checkout {
            Some(pending) => self.resume(account_id, &pending).await.map(Some),
            None => Ok(None),
        }
    }

    /// Order history, oldest first
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn list_orders(&self, account_id: AccountId) -> ShopResult<Vec<Order>> {
        let account = self
            .deadlines
            .read("load_orders", require_account(&self.accounts, account_id))
            .await?;
        Ok(account.doc.orders)
    }

    async fn load(&self, account_id: AccountId) -> ShopResult<Versioned<UserAccount>> {
        self.deadlines
            .mutate("load_account", require_account(&self.accounts, account_id))
            .await
    }

    /// Start a workflow for `items` and drive it to completion
    async fn place(
        &self,
        account_id: AccountId,
        expected_version: Option<u64>,
        source: CheckoutSource,
        items: Vec<CartItem>,
    ) -> ShopResult<OrderId> {
        let total = pricing::total(&items)?;
        let order = Order::pending(total);
        let order_id = order.id;
        let pending = PendingCheckout::new(order_id, source, items);

        self.deadlines
            .mutate(
                "begin_checkout",
                self.accounts.update(
                    account_id,
                    expected_version,
                    AccountUpdate::BeginCheckout {
                        order,
                        pending: pending.clone(),
                    },
                ),
            )
            .await?;

        self.finish(account_id, &pending).await?;

        info!(
            order_id = %order_id,
            total,
            items = pending.items.len(),
            ?source,
            "Order placed"
        );
        Ok(order_id)
    }

    /// Run the remaining steps of a recorded workflow
    async fn finish(&self, account_id: AccountId, pending: &PendingCheckout) -> ShopResult<OrderId> {
        let order_id = pending.order_id;
        let mut stage = pending.stage;

        if stage == CheckoutStage::OrderCreated {
            self.deadlines
                .mutate(
                    "populate_order_items",
                    self.accounts.update(
                        account_id,
                        None,
                        AccountUpdate::PopulateOrderItems(order_id),
                    ),
                )
                .await
                .map_err(|err| ShopError::partial(order_id, stage, err))?;
            stage = CheckoutStage::ItemsPopulated;
        }

        self.deadlines
            .mutate(
                "complete_checkout",
                self.accounts
                    .update(account_id, None, AccountUpdate::CompleteCheckout(order_id)),
            )
            .await
            .map_err(|err| ShopError::partial(order_id, stage, err))?;
        Ok(order_id)
    }

    /// Finish a workflow left behind by an earlier call
    async fn resume(&self, account_id: AccountId, pending: &PendingCheckout) -> ShopResult<OrderId> {
        warn!(
            order_id = %pending.order_id,
            stage = %pending.stage,
            started_at = %pending.started_at,
            "Resuming stalled checkout"
        );
        self.finish(account_id, pending).await
    }
}
