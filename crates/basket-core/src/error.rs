//! # Shop Error Types
//!
//! Typed error handling for the basket cart/order engine.
//! All core operations return `Result<T, ShopError>`.

use crate::address::AddressSlot;
use crate::ids::OrderId;
use crate::order::CheckoutStage;
use thiserror::Error;

/// Coarse classification of a [`ShopError`], used by callers to decide
/// between rejecting, retrying and reconciling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed identifier or missing field, rejected before any store access
    InvalidInput,
    /// Account, product, slot or order absent
    NotFound,
    /// Expected business-rule rejection (slot limit, empty cart, ...)
    BusinessRule,
    /// Store failed, timed out or lost a version race
    Infrastructure,
    /// A checkout workflow stopped after its order was recorded
    PartialCheckout,
    /// Configuration or invariant breakage
    Fatal,
}

/// Core error type for all cart, address and order operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Account identifier is malformed
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    /// Product identifier is malformed
    #[error("Invalid product id: {0}")]
    InvalidProductId(String),

    /// Invalid request data (blank field, unknown slot name, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Identity token missing, malformed or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Account document does not exist
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Address slot holds no address
    #[error("No {slot} address on this account")]
    AddressSlotNotFound { slot: AddressSlot },

    /// Order not present in the account's history
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// Both address slots are taken
    #[error("Address book is full ({capacity} addresses)")]
    SlotLimitExceeded { capacity: usize },

    /// Checkout requested on an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart checkout is still in flight for this account
    #[error("Checkout {order_id} is in progress for this account")]
    CheckoutInProgress { order_id: OrderId },

    /// Total does not fit the price type
    #[error("Price total overflow after {items} items")]
    PriceOverflow { items: usize },

    /// Underlying store call failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Store call did not finish within its deadline
    #[error("Deadline exceeded after {timeout_ms}ms during {operation}")]
    DeadlineExceeded {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// Document changed between read and conditional write
    #[error("Version conflict on account {account_id}: expected {expected}, found {found}")]
    VersionConflict {
        account_id: String,
        expected: u64,
        found: u64,
    },

    /// Order was recorded but the workflow did not finish
    #[error("Partial checkout for order {order_id} (stalled after {stage}): {source}")]
    PartialCheckout {
        order_id: OrderId,
        stage: CheckoutStage,
        #[source]
        source: Box<ShopError>,
    },

    /// Configuration errors (missing keys, invalid values, unreadable catalog)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShopError {
    pub fn account_not_found(account_id: impl ToString) -> Self {
        ShopError::AccountNotFound {
            account_id: account_id.to_string(),
        }
    }

    pub fn product_not_found(product_id: impl ToString) -> Self {
        ShopError::ProductNotFound {
            product_id: product_id.to_string(),
        }
    }

    /// Wrap an error raised after `stage` of the workflow for `order_id`.
    ///
    /// An error that already is a partial checkout is returned unchanged.
    pub fn partial(order_id: OrderId, stage: CheckoutStage, source: ShopError) -> Self {
        match source {
            err @ ShopError::PartialCheckout { .. } => err,
            other => ShopError::PartialCheckout {
                order_id,
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShopError::InvalidAccountId(_)
            | ShopError::InvalidProductId(_)
            | ShopError::InvalidRequest(_)
            | ShopError::Unauthorized(_) => ErrorCategory::InvalidInput,
            ShopError::AccountNotFound { .. }
            | ShopError::ProductNotFound { .. }
            | ShopError::AddressSlotNotFound { .. }
            | ShopError::OrderNotFound { .. } => ErrorCategory::NotFound,
            ShopError::SlotLimitExceeded { .. }
            | ShopError::EmptyCart
            | ShopError::CheckoutInProgress { .. }
            | ShopError::PriceOverflow { .. } => ErrorCategory::BusinessRule,
            ShopError::StoreUnavailable(_)
            | ShopError::DeadlineExceeded { .. }
            | ShopError::VersionConflict { .. } => ErrorCategory::Infrastructure,
            ShopError::PartialCheckout { .. } => ErrorCategory::PartialCheckout,
            ShopError::Configuration(_) | ShopError::Internal(_) | ShopError::Serialization(_) => {
                ErrorCategory::Fatal
            }
        }
    }

    /// Returns true if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Infrastructure)
            || matches!(self, ShopError::CheckoutInProgress { .. })
    }

    /// Returns true if the error should be logged as an operational fault.
    /// Business-rule, lookup and input rejections are expected outcomes.
    pub fn is_fault(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Infrastructure | ErrorCategory::PartialCheckout | ErrorCategory::Fatal
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::InvalidAccountId(_) => 400,
            ShopError::InvalidProductId(_) => 400,
            ShopError::InvalidRequest(_) => 400,
            ShopError::Unauthorized(_) => 401,
            ShopError::AccountNotFound { .. } => 404,
            ShopError::ProductNotFound { .. } => 404,
            ShopError::AddressSlotNotFound { .. } => 404,
            ShopError::OrderNotFound { .. } => 404,
            ShopError::SlotLimitExceeded { .. } => 422,
            ShopError::EmptyCart => 422,
            ShopError::CheckoutInProgress { .. } => 409,
            ShopError::PriceOverflow { .. } => 422,
            ShopError::StoreUnavailable(_) => 503,
            ShopError::DeadlineExceeded { .. } => 504,
            ShopError::VersionConflict { .. } => 409,
            ShopError::PartialCheckout { .. } => 500,
            ShopError::Configuration(_) => 500,
            ShopError::Internal(_) => 500,
            ShopError::Serialization(_) => 500,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::InvalidAccountId(_) => "invalid_account_id",
            ShopError::InvalidProductId(_) => "invalid_product_id",
            ShopError::InvalidRequest(_) => "invalid_request",
            ShopError::Unauthorized(_) => "unauthorized",
            ShopError::AccountNotFound { .. } => "account_not_found",
            ShopError::ProductNotFound { .. } => "product_not_found",
            ShopError::AddressSlotNotFound { .. } => "address_slot_not_found",
            ShopError::OrderNotFound { .. } => "order_not_found",
            ShopError::SlotLimitExceeded { .. } => "slot_limit_exceeded",
            ShopError::EmptyCart => "empty_cart",
            ShopError::CheckoutInProgress { .. } => "checkout_in_progress",
            ShopError::PriceOverflow { .. } => "price_overflow",
            ShopError::StoreUnavailable(_) => "store_unavailable",
            ShopError::DeadlineExceeded { .. } => "deadline_exceeded",
            ShopError::VersionConflict { .. } => "version_conflict",
            ShopError::PartialCheckout { .. } => "partial_checkout",
            ShopError::Configuration(_) => "configuration_error",
            ShopError::Internal(_) => "internal_error",
            ShopError::Serialization(_) => "serialization_error",
        }
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;
