//! # Account Document
//!
//! One document per user embedding the cart, the address book, the order
//! history and the in-flight checkout record.
//!
//! Stores mutate documents only through [`AccountUpdate`]. Each update is
//! applied to a single document as one atomic step, which is the only
//! atomicity the store promises.

use crate::address::{Address, AddressBook, AddressFields, AddressSlot};
use crate::cart::CartItem;
use crate::error::{ShopError, ShopResult};
use crate::ids::{AccountId, OrderId, ProductId};
use crate::order::{CheckoutStage, Order, OrderStatus, PendingCheckout};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's account document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: AccountId,

    #[serde(default)]
    pub cart: Vec<CartItem>,

    #[serde(default)]
    pub addresses: AddressBook,

    #[serde(default)]
    pub orders: Vec<Order>,

    /// In-flight checkout, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_checkout: Option<PendingCheckout>,

    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// A fresh account with empty cart, addresses and orders
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            cart: Vec::new(),
            addresses: AddressBook::new(),
            orders: Vec::new(),
            pending_checkout: None,
            created_at: Utc::now(),
        }
    }

    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    fn order_mut(&mut self, order_id: OrderId) -> ShopResult<&mut Order> {
        self.orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(ShopError::OrderNotFound { order_id })
    }

    fn ensure_cart_unlocked(&self) -> ShopResult<()> {
        match &self.pending_checkout {
            Some(pending) if pending.locks_cart() => Err(ShopError::CheckoutInProgress {
                order_id: pending.order_id,
            }),
            _ => Ok(()),
        }
    }

    /// Apply one update in place.
    ///
    /// On error the document is left unchanged.
    pub fn apply(&mut self, update: AccountUpdate) -> ShopResult<UpdateOutcome> {
        match update {
            AccountUpdate::PushCartItem(item) => {
                self.ensure_cart_unlocked()?;
                self.cart.push(item);
                Ok(UpdateOutcome::Done)
            }
            AccountUpdate::PullCartItems(product_id) => {
                self.ensure_cart_unlocked()?;
                let before = self.cart.len();
                self.cart.retain(|item| item.product_id != product_id);
                Ok(UpdateOutcome::Removed(before - self.cart.len()))
            }
            AccountUpdate::AddAddress(address) => {
                let slot = self.addresses.add(address)?;
                Ok(UpdateOutcome::AddressStored(slot))
            }
            AccountUpdate::EditAddress { slot, fields } => {
                self.addresses.edit(slot, fields)?;
                Ok(UpdateOutcome::Done)
            }
            AccountUpdate::ClearAddresses => {
                self.addresses.clear();
                Ok(UpdateOutcome::Done)
            }
            AccountUpdate::BeginCheckout { order, pending } => {
                if let Some(existing) = &self.pending_checkout {
                    return Err(ShopError::CheckoutInProgress {
                        order_id: existing.order_id,
                    });
                }
                if order.id != pending.order_id {
                    return Err(ShopError::Internal(format!(
                        "checkout record {} does not match order {}",
                        pending.order_id, order.id
                    )));
                }
                self.orders.push(order);
                self.pending_checkout = Some(pending);
                Ok(UpdateOutcome::Done)
            }
            AccountUpdate::PopulateOrderItems(order_id) => self.populate_order_items(order_id),
            AccountUpdate::CompleteCheckout(order_id) => self.complete_checkout(order_id),
        }
    }

    fn populate_order_items(&mut self, order_id: OrderId) -> ShopResult<UpdateOutcome> {
        let items = match &self.pending_checkout {
            Some(pending) if pending.order_id == order_id => pending.items.clone(),
            // Already finished by an earlier attempt.
            _ if self.order(order_id).is_some_and(Order::is_complete) => {
                return Ok(UpdateOutcome::Done)
            }
            _ => return Err(ShopError::OrderNotFound { order_id }),
        };

        self.order_mut(order_id)?.items = items;
        if let Some(pending) = self.pending_checkout.as_mut() {
            pending.stage = CheckoutStage::ItemsPopulated;
        }
        Ok(UpdateOutcome::Done)
    }

    fn complete_checkout(&mut self, order_id: OrderId) -> ShopResult<UpdateOutcome> {
        let clears_cart = match &self.pending_checkout {
            Some(pending) if pending.order_id == order_id => {
                if pending.stage != CheckoutStage::ItemsPopulated {
                    return Err(ShopError::Internal(format!(
                        "order {} completed before its items were written",
                        order_id
                    )));
                }
                pending.locks_cart()
            }
            _ if self.order(order_id).is_some_and(Order::is_complete) => {
                return Ok(UpdateOutcome::Done)
            }
            _ => return Err(ShopError::OrderNotFound { order_id }),
        };

        self.order_mut(order_id)?.status = OrderStatus::Complete;
        if clears_cart {
            self.cart.clear();
        }
        self.pending_checkout = None;
        Ok(UpdateOutcome::Done)
    }
}

/// A single-document atomic update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountUpdate {
    /// Append a snapshot to the cart
    PushCartItem(CartItem),
    /// Remove every cart entry for a product
    PullCartItems(ProductId),
    /// Store an address in the first free slot
    AddAddress(Address),
    /// Overwrite the fields of one slot
    EditAddress {
        slot: AddressSlot,
        fields: AddressFields,
    },
    /// Empty the address book
    ClearAddresses,
    /// Append a pending order and record the workflow
    BeginCheckout {
        order: Order,
        pending: PendingCheckout,
    },
    /// Copy the workflow's snapshots into its order
    PopulateOrderItems(OrderId),
    /// Clear the cart (cart workflows), mark the order complete, drop the record
    CompleteCheckout(OrderId),
}

impl AccountUpdate {
    /// Short name for logs and fault matching
    pub fn kind(&self) -> &'static str {
        match self {
            AccountUpdate::PushCartItem(_) => "push_cart_item",
            AccountUpdate::PullCartItems(_) => "pull_cart_items",
            AccountUpdate::AddAddress(_) => "add_address",
            AccountUpdate::EditAddress { .. } => "edit_address",
            AccountUpdate::ClearAddresses => "clear_addresses",
            AccountUpdate::BeginCheckout { .. } => "begin_checkout",
            AccountUpdate::PopulateOrderItems(_) => "populate_order_items",
            AccountUpdate::CompleteCheckout(_) => "complete_checkout",
        }
    }
}

/// What an applied update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Done,
    /// Number of cart entries pulled
    Removed(usize),
    /// Slot the new address landed in
    AddressStored(AddressSlot),
}

/// A document together with its store version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub doc: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, doc: T) -> Self {
        Self { version, doc }
    }
}

/// Result of a successful store update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReceipt {
    /// Document version after the update
    pub version: u64,
    pub outcome: UpdateOutcome,
}
