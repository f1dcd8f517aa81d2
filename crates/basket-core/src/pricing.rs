//! # Pricing
//!
//! Sums snapshot prices into a total. Shared by the cart view and checkout
//! so both always agree on what a cart costs.

use crate::cart::CartItem;
use crate::error::{ShopError, ShopResult};

/// Sum of the `price` fields of `items`.
///
/// Uses checked `u64` arithmetic end to end; an overflowing sum is an
/// error, never a wrapped or truncated value.
pub fn total(items: &[CartItem]) -> ShopResult<u64> {
    items
        .iter()
        .enumerate()
        .try_fold(0u64, |acc, (index, item)| {
            acc.checked_add(item.price)
                .ok_or(ShopError::PriceOverflow { items: index + 1 })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;
    use crate::product::{Product, MAX_UNIT_PRICE};

    fn item(price: u64) -> CartItem {
        CartItem::from_product(&Product::new(ProductId::new(), "item", price))
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(total(&[]).unwrap(), 0);
    }

    #[test]
    fn test_sums_every_entry() {
        let items = vec![item(500), item(500), item(1)];
        assert_eq!(total(&items).unwrap(), 1001);
    }

    #[test]
    fn test_large_prices_do_not_truncate() {
        // Anything past i32::MAX would be lost through a 32-bit intermediate.
        let items = vec![item(MAX_UNIT_PRICE), item(MAX_UNIT_PRICE), item(MAX_UNIT_PRICE)];
        assert_eq!(total(&items).unwrap(), 3 * MAX_UNIT_PRICE);
    }

    #[test]
    fn test_overflow_is_reported() {
        let items = vec![item(u64::MAX), item(1)];
        assert!(matches!(
            total(&items),
            Err(ShopError::PriceOverflow { items: 2 })
        ));
    }
}
