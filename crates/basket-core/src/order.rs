//! # Order Types
//!
//! Orders and the checkout workflow record for basket-rs.

use crate::cart::CartItem;
use crate::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an order will be paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid online
    Digital,
    /// Paid on delivery
    #[default]
    CashOnDelivery,
}

/// Lifecycle of an order record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Recorded; items or cart clearing still outstanding
    Pending,
    /// Workflow finished
    Complete,
}

/// An order in an account's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: OrderId,

    /// Purchased snapshots
    pub items: Vec<CartItem>,

    pub ordered_at: DateTime<Utc>,

    /// Sum of item prices at checkout time
    pub total_price: u64,

    pub discount: u64,

    pub payment_method: PaymentMethod,

    pub status: OrderStatus,
}

impl Order {
    /// Create a pending order with no items yet
    pub fn pending(total_price: u64) -> Self {
        Self {
            id: OrderId::new(),
            items: Vec::new(),
            ordered_at: Utc::now(),
            total_price,
            discount: 0,
            payment_method: PaymentMethod::CashOnDelivery,
            status: OrderStatus::Pending,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, OrderStatus::Complete)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// What a checkout workflow was started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSource {
    /// The account's cart; clearing it is the last step
    Cart,
    /// A single product bought directly; the cart is untouched
    InstantBuy,
}

/// Last completed step of a checkout workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    /// Order appended to history, item list still empty
    OrderCreated,
    /// Order items written, cart not yet cleared
    ItemsPopulated,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStage::OrderCreated => f.write_str("order_created"),
            CheckoutStage::ItemsPopulated => f.write_str("items_populated"),
        }
    }
}

/// Durable record of an in-flight checkout, stored on the account until
/// the workflow completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheckout {
    pub order_id: OrderId,
    pub source: CheckoutSource,
    pub stage: CheckoutStage,
    /// Snapshots that will populate the order
    pub items: Vec<CartItem>,
    pub started_at: DateTime<Utc>,
}

impl PendingCheckout {
    pub fn new(order_id: OrderId, source: CheckoutSource, items: Vec<CartItem>) -> Self {
        Self {
            order_id,
            source,
            stage: CheckoutStage::OrderCreated,
            items,
            started_at: Utc::now(),
        }
    }

    /// True when the cart must stay frozen until this workflow completes
    pub fn locks_cart(&self) -> bool {
        matches!(self.source, CheckoutSource::Cart)
    }
}
